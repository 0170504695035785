//! Conversions between the error types of different layers.
//!
//! The domain layer must not depend on service or repository error types, so
//! the glue lives here.

use crate::domain::types::TypeConstraintError;
#[cfg(feature = "server")]
use crate::forms::categories::CategoryFormError;
#[cfg(feature = "server")]
use crate::forms::jewelry::JewelryFormError;
use crate::repository::RepositoryError;
#[cfg(feature = "server")]
use crate::services::ServiceError;

#[cfg(feature = "server")]
impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

/// Pool failures mean the database is unreachable; every other repository
/// failure is internal.
#[cfg(feature = "server")]
impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::Pool(_) => ServiceError::Unavailable,
            RepositoryError::Database(_) | RepositoryError::ValidationError(_) => {
                ServiceError::Internal
            }
        }
    }
}

#[cfg(feature = "server")]
impl From<CategoryFormError> for ServiceError {
    fn from(val: CategoryFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

#[cfg(feature = "server")]
impl From<JewelryFormError> for ServiceError {
    fn from(val: JewelryFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use super::*;
    use crate::domain::types::CategoryId;

    #[test]
    fn constraint_errors_keep_their_message() {
        let err = CategoryId::new(0).unwrap_err();
        let message = err.to_string();

        assert_eq!(ServiceError::from(err), ServiceError::TypeConstraint(message));
    }

    #[test]
    fn exhausted_pool_maps_to_unavailable() {
        use diesel::r2d2::{ConnectionManager, Pool};
        use diesel::sqlite::SqliteConnection;
        use std::time::Duration;

        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(Duration::from_millis(50))
            .build(ConnectionManager::<SqliteConnection>::new(":memory:"))
            .unwrap();
        let _held = pool.get().unwrap();
        let Err(err) = pool.get() else {
            panic!("second connection should time out");
        };

        assert_eq!(
            ServiceError::from(RepositoryError::Pool(err)),
            ServiceError::Unavailable
        );
        assert_eq!(
            ServiceError::from(RepositoryError::ValidationError("bad".into())),
            ServiceError::Internal
        );
    }

    #[test]
    fn form_errors_map_to_form() {
        assert!(matches!(
            ServiceError::from(JewelryFormError::MissingName),
            ServiceError::Form(_)
        ));
    }
}
