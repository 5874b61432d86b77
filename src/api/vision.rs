//! Image generation calls

use rand::Rng;

use super::{ApiResult, Backend, VisionRequest};
use crate::session::{CredentialStore, Session};

/// Generated images are always square at this size
pub const IMAGE_WIDTH: u32 = 1024;
pub const IMAGE_HEIGHT: u32 = 1024;

/// Upper bound (exclusive) for client-generated seeds
pub const SEED_LIMIT: u32 = 100_000;

/// Pseudo-random seed in `0..SEED_LIMIT`
pub fn random_seed() -> u32 {
    rand::thread_rng().gen_range(0..SEED_LIMIT)
}

/// Build a fixed-size request, picking a seed when none is supplied
pub fn image_request(prompt: &str, model: &str, seed: Option<u32>) -> VisionRequest {
    VisionRequest {
        prompt: prompt.to_string(),
        model: model.to_string(),
        width: IMAGE_WIDTH,
        height: IMAGE_HEIGHT,
        seed: seed.unwrap_or_else(random_seed),
    }
}

/// Generate an image and return its URL, refreshing and resending once on 401.
///
/// The retry resends the same request, seed included.
pub async fn generate<B: Backend, S: CredentialStore>(
    session: &Session<B, S>,
    request: &VisionRequest,
) -> ApiResult<String> {
    let backend = session.backend();
    session
        .authorized(|credential| async move { backend.generate_image(&credential, request).await })
        .await
        .map(|response| response.image_url)
}
