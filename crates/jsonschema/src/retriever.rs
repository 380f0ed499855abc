//! External schema retrieval.
//!
//! Network and file-system fetchers are external collaborators, not part of
//! this engine (see [`crate::loader::SchemaLoader`]); this module only
//! re-exports the trait boundary and, behind `resolve-file`, a retriever for
//! `file://` URIs for convenience in embedding applications.
pub use referencing::{DefaultRetriever, Retrieve};

#[cfg(feature = "resolve-file")]
mod file {
    use referencing::Retrieve;
    use serde_json::Value;
    use std::error::Error as StdError;
    use url::Url;

    /// Retrieves `file://` schemas from the local filesystem. Any other scheme is refused.
    #[derive(Debug, Default)]
    pub struct FileRetriever;

    impl Retrieve for FileRetriever {
        fn retrieve(&self, uri: &Url) -> Result<Value, Box<dyn StdError + Send + Sync>> {
            if uri.scheme() != "file" {
                return Err(format!("unsupported scheme: {}", uri.scheme()).into());
            }
            let path = uri
                .to_file_path()
                .map_err(|()| "invalid file path".to_string())?;
            let file = std::fs::File::open(path)?;
            Ok(serde_json::from_reader(file)?)
        }
    }
}

#[cfg(feature = "resolve-file")]
pub use file::FileRetriever;
