use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while bringing up the scene. Any of these leaves the game not ready.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing element `{0}`")]
    MissingElement(String),
    #[error("failed to load image {path}: {message}")]
    Image { path: String, message: String },
    #[error("failed to fetch {path}: {message}")]
    Fetch { path: String, message: String },
    #[error("invalid sprite sheet data in {path}")]
    SpriteSheet {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("sprite sheet {0} has no frames")]
    EmptyClip(String),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("{0}")]
    Js(String),
    #[error("game already started")]
    AlreadyStarted,
}

impl AssetError {
    pub(crate) fn js(value: impl Into<JsValue>) -> Self {
        AssetError::Js(describe(&value.into()))
    }
}

/// The host refused to schedule another frame.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("frame scheduling unavailable: {0}")]
    Unavailable(String),
}

impl From<AssetError> for JsValue {
    fn from(err: AssetError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
