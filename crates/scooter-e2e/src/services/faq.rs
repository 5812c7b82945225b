// UI implementation of FaqService

use super::FaqService;
use crate::error::Result;
use crate::pages::check_faq_index;
use crate::session::Session;
use async_trait::async_trait;

/// Reads the FAQ accordion of the page the session currently shows
#[derive(Debug, Clone)]
pub struct UiFaqService {
    session: Session,
}

impl UiFaqService {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl FaqService for UiFaqService {
    async fn open_question(&self, index: usize) -> Result<()> {
        check_faq_index(index)?;
        tracing::info!("Opening FAQ question {}", index);
        self.session.landing().open_faq_panel(index).await
    }

    async fn get_answer(&self, index: usize) -> Result<String> {
        check_faq_index(index)?;
        self.session.landing().read_faq_answer(index).await
    }
}
