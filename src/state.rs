/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - authorizer: 検証設定とルール (不変), extractor: claims → principal の戦略
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::{Authorizer, principal::PrincipalExtractor};

#[derive(Clone)]
pub struct AppState {
    pub authorizer: Arc<Authorizer>,
    pub extractor: Arc<dyn PrincipalExtractor>,
}

impl AppState {
    pub fn new(authorizer: Arc<Authorizer>, extractor: Arc<dyn PrincipalExtractor>) -> Self {
        Self {
            authorizer,
            extractor,
        }
    }
}
