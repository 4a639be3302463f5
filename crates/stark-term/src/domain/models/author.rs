use serde::Deserialize;
use serde::Serialize;
use strum::Display;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, Default)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    #[default]
    Ai,
}

impl Author {
    pub fn label(&self) -> &'static str {
        match self {
            Author::User => "You",
            Author::Ai => "STARK",
        }
    }
}
