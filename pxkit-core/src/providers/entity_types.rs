use kanau::processor::Processor;
use pxkit_sdk::objects::{ApiException, EntityType, Site};

/// Entity types offered for a payment method on a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetEntityTypes {
    pub site: Site,
    pub payment_method_id: String,
}

/// Built-in entity types: individual and association.
///
/// Only Colombia's bank transfers use entity types today; every other site
/// gets an empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteEntityTypes;

impl Processor<GetEntityTypes> for SiteEntityTypes {
    type Output = Vec<EntityType>;
    type Error = ApiException;
    async fn process(&self, query: GetEntityTypes) -> Result<Vec<EntityType>, ApiException> {
        let entity_types = match query.site {
            Site::Colombia => vec![
                EntityType {
                    id: "individual".to_string(),
                    name: "Individual".to_string(),
                },
                EntityType {
                    id: "association".to_string(),
                    name: "Association".to_string(),
                },
            ],
            _ => vec![],
        };
        Ok(entity_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_colombia_has_entity_types() {
        let types = SiteEntityTypes
            .process(GetEntityTypes {
                site: Site::Colombia,
                payment_method_id: "pse".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].id, "individual");

        let none = SiteEntityTypes
            .process(GetEntityTypes {
                site: Site::Argentina,
                payment_method_id: "rapipago".to_string(),
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
