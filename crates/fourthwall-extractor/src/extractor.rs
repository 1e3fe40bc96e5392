//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::flight::KeyedLocks;
use crate::gateway::CacheGateway;
use crate::parser::{parse_response, validate_characters};
use crate::prompt::{take_sample, PromptBuilder};
use crate::types::ExtractionOutcome;
use fourthwall_domain::{
    BookId, BookRecord, Character, DocumentStore, GenerationRequest, LanguageModel, VoiceRoster,
};
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The Extractor turns book text into a cached list of voiced characters
///
/// Lookups go through the [`CacheGateway`] first; the model is only called
/// on a miss, and only a validated, non-empty character list is written back.
pub struct Extractor<L, S> {
    llm: L,
    gateway: CacheGateway<S>,
    roster: VoiceRoster,
    config: ExtractorConfig,
    flights: KeyedLocks,
}

impl<L, S> Extractor<L, S>
where
    L: LanguageModel,
    L::Error: Display,
    S: DocumentStore,
    S::Error: Display,
{
    /// Create a new Extractor
    pub fn new(llm: L, store: S, roster: VoiceRoster, config: ExtractorConfig) -> Self {
        Self {
            llm,
            gateway: CacheGateway::new(store),
            roster,
            config,
            flights: KeyedLocks::new(),
        }
    }

    /// The cache gateway backing this extractor
    pub fn gateway(&self) -> &CacheGateway<S> {
        &self.gateway
    }

    /// Voices characters are assigned from
    pub fn roster(&self) -> &VoiceRoster {
        &self.roster
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract characters for a book, serving from cache when possible
    ///
    /// `book_id` may be a raw upload filename; it is normalized first.
    pub async fn extract(
        &self,
        book_id: &str,
        full_text: &str,
    ) -> Result<BookRecord, ExtractionError> {
        let book_id = BookId::from_filename(book_id).map_err(ExtractionError::InvalidBookId)?;
        self.extract_book(&book_id, full_text).await
    }

    /// Like [`Extractor::extract`] but never fails
    ///
    /// Errors are folded into [`ExtractionOutcome::Failed`].
    pub async fn run(&self, book_id: &str, full_text: &str) -> ExtractionOutcome {
        let outcome = ExtractionOutcome::from(self.extract(book_id, full_text).await);
        if let Some(kind) = outcome.kind() {
            warn!(book_id, kind = %kind, "Extraction failed");
        }
        outcome
    }

    /// Extract characters for an already-normalized book id
    pub async fn extract_book(
        &self,
        book_id: &BookId,
        full_text: &str,
    ) -> Result<BookRecord, ExtractionError> {
        let _flight = if self.config.single_flight {
            Some(self.flights.acquire(book_id.as_str()).await)
        } else {
            None
        };

        if let Some(record) = self.cached_record(book_id)? {
            info!(book_id = %book_id, characters = record.characters.len(), "Serving cached characters");
            return Ok(record);
        }

        if full_text.trim().is_empty() {
            warn!(book_id = %book_id, "Refusing to extract from empty text");
            return Err(ExtractionError::EmptyText(book_id.to_string()));
        }

        let start = Instant::now();
        let sample = take_sample(full_text, self.config.sample_chars);
        info!(
            book_id = %book_id,
            sample_chars = sample.chars().count(),
            "Starting extraction"
        );

        let prompt = PromptBuilder::new(sample, &self.roster)
            .with_character_range(self.config.min_characters, self.config.max_characters)
            .build();
        debug!("Prompt length: {} chars", prompt.len());

        let request = GenerationRequest::json(self.config.model_id.as_str(), prompt);
        let (book_title, characters) = self.generate_characters(book_id, &request).await?;

        let record = self.gateway.store(book_id, book_title, characters)?;

        info!(
            book_id = %book_id,
            characters = record.characters.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Extraction complete"
        );
        Ok(record)
    }

    /// Cache hit whose voices all resolve in the current roster
    ///
    /// Voice references are rewritten to canonical roster ids. A record
    /// holding a voice the roster does not know (written under a different
    /// roster) is a miss, so a fresh extraction replaces it.
    fn cached_record(&self, book_id: &BookId) -> Result<Option<BookRecord>, ExtractionError> {
        let Some(mut record) = self.gateway.lookup(book_id)? else {
            return Ok(None);
        };

        for character in &mut record.characters {
            match self.roster.resolve(&character.assigned_voice_id) {
                Some(voice) => character.assigned_voice_id = voice.id.clone(),
                None => {
                    warn!(
                        book_id = %book_id,
                        character = %character.name,
                        voice = %character.assigned_voice_id,
                        "Cached voice is not in the roster; extracting again"
                    );
                    return Ok(None);
                }
            }
        }

        Ok(Some(record))
    }

    /// Call the model until it yields a usable character list
    async fn generate_characters(
        &self,
        book_id: &BookId,
        request: &GenerationRequest,
    ) -> Result<(Option<String>, Vec<Character>), ExtractionError> {
        let policy = self.config.retry_policy();
        let mut failures = 0u32;

        loop {
            let attempt = failures + 1;
            debug!(
                book_id = %book_id,
                attempt,
                max_attempts = policy.max_attempts(),
                "Calling model"
            );

            let generation = self.llm.generate(request).await.map_err(|e| {
                warn!(book_id = %book_id, attempt, "Model call failed: {}", e);
                ExtractionError::TransportFault(e.to_string())
            })?;

            if generation.is_empty() {
                warn!(book_id = %book_id, attempt, "Model returned no text; treating as a safety block");
                return Err(ExtractionError::SafetyBlocked);
            }
            debug!("LLM response length: {} chars", generation.text.len());

            let reason = match parse_response(&generation.text) {
                Ok(raw) => {
                    let characters =
                        validate_characters(raw.characters, &self.roster, self.config.max_characters);
                    if !characters.is_empty() {
                        debug!(book_id = %book_id, attempt, characters = characters.len(), "Parsed characters");
                        return Ok((raw.book_title, characters));
                    }
                    "No character passed validation".to_string()
                }
                Err(reason) => reason,
            };

            failures += 1;
            match policy.delay_after(failures) {
                Some(delay) => {
                    warn!(
                        book_id = %book_id,
                        attempt,
                        "Unusable response ({}); retrying in {}s",
                        reason,
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    warn!(book_id = %book_id, attempts = failures, "Giving up: {}", reason);
                    return Err(ExtractionError::MalformedOrEmptyResponse {
                        attempts: failures,
                        reason,
                    });
                }
            }
        }
    }
}
