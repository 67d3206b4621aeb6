//! The ownership guard: every mutating operation on a schedule record runs
//! through `ensure_owner` before touching the database.

use uuid::Uuid;

use crate::error::ApiError;

/// A record owned by exactly one employee
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

pub fn is_owner(actor_id: Uuid, record: &impl Owned) -> bool {
    record.owner_id() == actor_id
}

/// Reject unless the acting employee owns the record. An absent identifier is
/// treated exactly like a non-owner: forbidden, never silent success.
pub fn ensure_owner(actor_id: Option<Uuid>, record: &impl Owned) -> Result<(), ApiError> {
    match actor_id {
        Some(id) if is_owner(id, record) => Ok(()),
        _ => Err(ApiError::forbidden("You can only modify your own records")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Record {
        employee_id: Uuid,
    }

    impl Owned for Record {
        fn owner_id(&self) -> Uuid {
            self.employee_id
        }
    }

    #[test]
    fn owner_passes() {
        let owner = Uuid::new_v4();
        let record = Record { employee_id: owner };
        assert!(ensure_owner(Some(owner), &record).is_ok());
    }

    #[test]
    fn non_owner_forbidden() {
        let record = Record { employee_id: Uuid::new_v4() };
        let err = ensure_owner(Some(Uuid::new_v4()), &record).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn missing_identity_forbidden() {
        let record = Record { employee_id: Uuid::new_v4() };
        let err = ensure_owner(None, &record).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
