use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Banner {
    pub title: String,
    pub src: String,
    pub text: String,
}
