//! Category DTO exposed over the API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Category as sent and received by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    /// Ignored on create; must match the path on update
    #[serde(default)]
    #[schema(example = 1)]
    pub id: i32,
    #[validate(length(min = 1, max = 80, message = "O nome deve ter entre 1 e 80 caracteres"))]
    #[schema(example = "Bebidas")]
    pub name: String,
    #[validate(length(min = 1, max = 300, message = "A URL da imagem deve ter entre 1 e 300 caracteres"))]
    #[schema(example = "bebidas.jpg")]
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::to_value(CategoryDto {
            id: 3,
            name: "Lanches".to_string(),
            image_url: "lanches.jpg".to_string(),
        })
        .unwrap();
        assert_eq!(json["imageUrl"], "lanches.jpg");
    }

    #[test]
    fn test_name_length_validated() {
        let dto = CategoryDto {
            id: 0,
            name: "x".repeat(81),
            image_url: "a.jpg".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_id_defaults_when_absent() {
        let dto: CategoryDto =
            serde_json::from_str(r#"{"name":"Sobremesas","imageUrl":"sobremesas.jpg"}"#).unwrap();
        assert_eq!(dto.id, 0);
        assert!(dto.validate().is_ok());
    }
}
