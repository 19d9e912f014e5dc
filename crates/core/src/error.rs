use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    /// Machine-readable error code, e.g. `DIARY_NOT_FOUND` or `VALIDATION_ERROR`.
    pub fn code(&self) -> String {
        match self {
            CoreError::NotFound { entity, .. } => {
                format!("{}_NOT_FOUND", entity.to_ascii_uppercase())
            }
            CoreError::Validation(_) => "VALIDATION_ERROR".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_code_is_derived_from_entity() {
        let err = CoreError::NotFound {
            entity: "Pet",
            id: 7,
        };
        assert_eq!(err.code(), "PET_NOT_FOUND");
        assert_eq!(err.to_string(), "Entity not found: Pet with id 7");
    }

    #[test]
    fn validation_code() {
        let err = CoreError::Validation("userId is required".into());
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
