use thiserror::Error;

/// Shown when the backend gives no usable message
pub const GENERIC_SEARCH_FAILURE: &str = "La recherche a échoué. Veuillez réessayer.";

/// Failures of a single search round trip
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network-level failure, nothing came back
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx status or a payload carrying an `error` field
    #[error("remote error (status {status:?}): {message}")]
    Remote {
        status: Option<u16>,
        message: String,
    },

    #[error("could not decode search response: {0}")]
    Decode(String),

    #[error("invalid search request: {0}")]
    Validation(String),
}

impl SearchError {
    /// Message suitable for a user notification
    pub fn user_message(&self) -> String {
        match self {
            SearchError::Remote { message, .. } if !message.trim().is_empty() => message.clone(),
            SearchError::Validation(message) => message.clone(),
            _ => GENERIC_SEARCH_FAILURE.to_string(),
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Decode(err.to_string())
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Decode(err.to_string())
    }
}

/// Failures of the geocoding adapter
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Veuillez saisir une adresse")]
    EmptyAddress,

    #[error("coordinates out of range: {latitude}, {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },

    #[error("Adresse introuvable: {0}")]
    NotFound(String),

    #[error("geocoding transport error: {0}")]
    Transport(String),

    #[error("geocoding provider error: {0}")]
    Provider(String),
}

impl GeocodeError {
    pub fn user_message(&self) -> String {
        match self {
            GeocodeError::Transport(_) | GeocodeError::Provider(_) => {
                "Erreur lors de la géolocalisation de l'adresse".to_string()
            }
            GeocodeError::OutOfRange { .. } => "Coordonnées invalides".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GeocodeError::Provider(err.to_string())
        } else {
            GeocodeError::Transport(err.to_string())
        }
    }
}

/// Failures of the favorite toggle
#[derive(Debug, Error)]
pub enum FavoriteError {
    #[error("missing {0}")]
    Validation(&'static str),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("favorite toggle rejected: {0}")]
    Remote(String),

    #[error("could not decode favorite response: {0}")]
    Decode(String),
}

impl FavoriteError {
    pub fn user_message(&self) -> String {
        match self {
            FavoriteError::Validation("userId") => {
                "Connectez-vous pour gérer vos favoris".to_string()
            }
            FavoriteError::Remote(message) if !message.trim().is_empty() => message.clone(),
            _ => "Erreur lors de la mise à jour des favoris".to_string(),
        }
    }
}

impl From<reqwest::Error> for FavoriteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FavoriteError::Decode(err.to_string())
        } else {
            FavoriteError::Transport(err.to_string())
        }
    }
}
