pub mod availability;
pub mod employee;
pub mod pay_stub;
pub mod punch;
pub mod shift;

pub use availability::{Availability, AvailabilityInput, DayOfWeek};
pub use employee::Employee;
pub use pay_stub::{PayStub, PayStubInput};
pub use punch::{Punch, PunchInput};
pub use shift::{Shift, ShiftInput};

use std::collections::HashMap;

/// Record a missing-required-field error when the submitted value is absent
pub(crate) fn require<T>(
    errors: &mut HashMap<String, String>,
    field: &str,
    value: &Option<T>,
) {
    if value.is_none() {
        errors.insert(field.to_string(), "This field is required".to_string());
    }
}
