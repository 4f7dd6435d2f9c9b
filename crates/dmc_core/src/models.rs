use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait InferenceModel: Send + Sync {
    /// Returns the name of the model backing this implementation
    fn name(&self) -> &str;

    /// Produce a short synopsis of the given text. Inputs shorter than 50
    /// characters are returned unchanged without calling any external API.
    async fn summarize(&self, text: &str) -> Result<String>;

    /// Extract the full names of politicians mentioned in the text.
    /// Returns an empty list when none are recognized.
    async fn extract_politicians(&self, text: &str) -> Result<Vec<String>>;
}
