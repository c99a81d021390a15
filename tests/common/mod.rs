//! Shared helpers for HTTP-level tests

use serde_json::{json, Value};

/// A search result item as the API would send it
#[allow(dead_code)]
pub fn property_json(id: &str, categorie: &str, prix: u64, created_at: &str) -> Value {
    json!({
        "id": id,
        "nom": format!("Propriété {id}"),
        "categorie": categorie,
        "statut": "DISPONIBLE",
        "prix": prix,
        "surface": 180.0,
        "nombrePieces": 4,
        "latitude": 6.1319,
        "longitude": 1.2228,
        "imagePrincipale": format!("/images/{id}.jpg"),
        "noteMoyenne": 4.2,
        "nombreAvis": 7,
        "createdAt": created_at
    })
}

/// API base URL served by a mock server
#[allow(dead_code)]
pub fn api_base(server: &mockito::ServerGuard) -> String {
    format!("{}/api", server.url())
}
