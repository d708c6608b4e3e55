//! Serialized shape shared by the XML and TOML readers.
//! Attribute names carry quick-xml's `@` prefix, TOML keys match the aliases.

use alloc::{string::String, vec::Vec};
use serde::Deserialize;

use crate::declaration::{BeanDeclaration, PropertyRef};

#[derive(Deserialize)]
pub(super) struct RawBeans {
    #[serde(rename = "bean", default)]
    beans: Vec<RawBean>,
}

#[derive(Deserialize)]
struct RawBean {
    #[serde(rename = "@id", alias = "id", default)]
    id: String,
    #[serde(rename = "@class", alias = "class", default)]
    class: String,
    #[serde(rename = "property", default)]
    properties: Vec<RawProperty>,
}

#[derive(Deserialize)]
struct RawProperty {
    #[serde(rename = "@name", alias = "name", default)]
    name: String,
    #[serde(rename = "@ref", alias = "ref", default)]
    reference: String,
}

impl From<RawBeans> for Vec<BeanDeclaration> {
    fn from(RawBeans { beans }: RawBeans) -> Self {
        beans
            .into_iter()
            .map(|RawBean { id, class, properties }| BeanDeclaration {
                id,
                type_name: class,
                properties: properties
                    .into_iter()
                    .map(|RawProperty { name, reference }| PropertyRef { name, ref_id: reference })
                    .collect(),
            })
            .collect()
    }
}
