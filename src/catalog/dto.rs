use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Bakery {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub price: i64,
    pub image: String,
    pub description: String,
    pub bakery_id: i64,
}
