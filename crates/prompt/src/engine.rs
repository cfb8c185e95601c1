//! The prompt engine: one component holding every collaborator, built once
//! at startup and shared by all callers.
//!
//! Every operation reads the collaborators and builds its result locally.
//! Nothing is cached between calls, so concurrent callers for different
//! groups never see each other's state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chirp_config::ChirpConfig;
use chirp_core::error::Result;
use chirp_core::history::ChatHistoryProvider;
use chirp_core::memory::{EmbeddingService, KnowledgeStore, MemoryGraph, MemoryNode, TopicExtractor, TopicSet};
use chirp_core::message::{GroupId, IncomingMessage};
use chirp_core::schedule::{Clock, ScheduleProvider, SystemClock};
use chirp_memory::{InMemoryChatHistory, InMemoryKnowledgeStore, NoopEmbedder, StaticSchedule};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::compose::assembler::{date_clause, history_clause, knowledge_clause};
use crate::compose::{
    Persona, PersonaProfile, PromptAssembler, ResponseInputs, SharedContext, StyleModifier, Tone,
};
use crate::initiative::{InitiativeCheck, InitiativeSelection, InitiativeSelector, InitiativeSettings};
use crate::retrieval::{KnowledgeRetriever, MemoryRetriever, RecallSettings};

/// Tunables lifted out of [`ChirpConfig`].
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub max_context_size: usize,
    pub knowledge_threshold: f32,
    pub knowledge_limit: usize,
    pub recall: RecallSettings,
    pub initiative: InitiativeSettings,
}

impl EngineSettings {
    pub fn from_config(config: &ChirpConfig) -> Self {
        Self {
            max_context_size: config.chat.max_context_size,
            knowledge_threshold: config.knowledge.threshold,
            knowledge_limit: config.knowledge.limit,
            recall: RecallSettings {
                depth: config.recall.depth,
                first_layer_samples: config.recall.first_layer_samples,
                overlap_samples: config.recall.overlap_samples,
            },
            initiative: InitiativeSettings {
                min_memory_items: config.initiative.min_memory_items,
                candidate_count: config.initiative.candidate_count,
                memory_samples: config.initiative.memory_samples,
            },
        }
    }
}

/// Wall-clock duration of the two retrieval stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    pub recall: Duration,
    pub knowledge: Duration,
}

/// Everything one response build produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePrompts {
    pub generate: String,
    pub gate: String,
    pub persona: Persona,
    pub styles: Vec<StyleModifier>,
    pub tone: Tone,
    pub topics: TopicSet,
    pub memories: Vec<String>,
    pub timings: StageTimings,
}

pub struct PromptEngine {
    assembler: PromptAssembler,
    settings: EngineSettings,

    /// Concept graph for recall and initiative
    graph: Arc<dyn MemoryGraph>,

    topics: Arc<dyn TopicExtractor>,

    embedder: Arc<dyn EmbeddingService>,

    knowledge: Arc<dyn KnowledgeStore>,

    schedule: Arc<dyn ScheduleProvider>,

    history: Arc<dyn ChatHistoryProvider>,

    /// Source of the date and time in prompts
    clock: Arc<dyn Clock>,

    /// Configured slots, kept until a custom schedule replaces them
    schedule_slots: Option<Vec<(String, String)>>,
}

impl PromptEngine {
    /// Create an engine with knowledge retrieval disabled, the configured
    /// schedule, and no chat history. Fails when the persona list is too short.
    pub fn new(
        config: &ChirpConfig,
        graph: Arc<dyn MemoryGraph>,
        topics: Arc<dyn TopicExtractor>,
    ) -> Result<Self> {
        let profile = PersonaProfile::new(config.bot.nickname.clone(), &config.bot.personas)?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let slots: Vec<(String, String)> = config
            .schedule
            .entries
            .iter()
            .map(|e| (e.start.clone(), e.activity.clone()))
            .collect();
        let schedule = StaticSchedule::new(slots.clone(), clock.clone());

        Ok(Self {
            assembler: PromptAssembler::new(profile),
            settings: EngineSettings::from_config(config),
            graph,
            topics,
            embedder: Arc::new(NoopEmbedder),
            knowledge: Arc::new(InMemoryKnowledgeStore::new()),
            schedule: Arc::new(schedule),
            history: Arc::new(InMemoryChatHistory::new()),
            clock,
            schedule_slots: Some(slots),
        })
    }

    /// Enable knowledge retrieval.
    pub fn with_knowledge(
        mut self,
        embedder: Arc<dyn EmbeddingService>,
        store: Arc<dyn KnowledgeStore>,
    ) -> Self {
        self.embedder = embedder;
        self.knowledge = store;
        self
    }

    /// Replace the configured schedule. A later [`with_clock`](Self::with_clock)
    /// leaves it untouched.
    pub fn with_schedule(mut self, schedule: Arc<dyn ScheduleProvider>) -> Self {
        self.schedule = schedule;
        self.schedule_slots = None;
        self
    }

    pub fn with_history(mut self, history: Arc<dyn ChatHistoryProvider>) -> Self {
        self.history = history;
        self
    }

    /// Replace the clock used for the date clause. The configured schedule
    /// is rebuilt on the same clock so the time and the activity agree.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        if let Some(slots) = &self.schedule_slots {
            self.schedule = Arc::new(StaticSchedule::new(slots.clone(), clock.clone()));
        }
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn profile(&self) -> &PersonaProfile {
        self.assembler.profile()
    }

    /// Build the GENERATE and GATE prompts for an incoming message.
    pub async fn build_response_prompts(&self, message: &IncomingMessage) -> ResponsePrompts {
        let mut rng = StdRng::from_os_rng();
        self.build_response_prompts_with_rng(message, &mut rng).await
    }

    pub async fn build_response_prompts_with_rng<R: Rng + ?Sized>(
        &self,
        message: &IncomingMessage,
        rng: &mut R,
    ) -> ResponsePrompts {
        // ── Recall ──
        let started = Instant::now();
        let topics = self.topics.identify(&message.text);
        let recall =
            MemoryRetriever::new(self.graph.as_ref(), self.settings.recall).recall(&topics, rng);
        let recall_elapsed = started.elapsed();
        debug!(
            topics = ?topics,
            memories = recall.selected.len(),
            recall_ms = recall_elapsed.as_millis() as u64,
            "Recall finished"
        );

        let tone = Tone::from_score(message.relationship);
        let date = self.date_clause();

        // ── Knowledge ──
        let started = Instant::now();
        let knowledge = KnowledgeRetriever::new(self.embedder.as_ref(), self.knowledge.as_ref())
            .retrieve(
                &message.text,
                self.settings.knowledge_threshold,
                self.settings.knowledge_limit,
            )
            .await;
        let knowledge_elapsed = started.elapsed();
        debug!(
            matched = !knowledge.is_empty(),
            knowledge_ms = knowledge_elapsed.as_millis() as u64,
            "Knowledge lookup finished"
        );

        let history = self.history_clause(message.group_id.as_ref()).await;
        let ctx = SharedContext {
            knowledge: knowledge_clause(&knowledge),
            date,
            history,
        };

        let persona = Persona::choose(rng);
        let styles = StyleModifier::draw(rng);
        let pair = self.assembler.assemble(
            &ctx,
            &ResponseInputs {
                sender: message.sender(),
                text: &message.text,
                tone,
                memory_clause: &recall.clause,
                persona,
                styles: &styles,
            },
        );

        info!(
            group = message.group_id.as_ref().map(|g| g.0.as_str()).unwrap_or("-"),
            ?tone,
            ?persona,
            styles = styles.len(),
            topics = topics.len(),
            "Built response prompts"
        );

        ResponsePrompts {
            generate: pair.generate,
            gate: pair.gate,
            persona,
            styles,
            tone,
            topics,
            memories: recall.selected,
            timings: StageTimings {
                recall: recall_elapsed,
                knowledge: knowledge_elapsed,
            },
        }
    }

    /// Pick candidate topics for unprompted speech and build the select prompt.
    pub async fn build_initiative_selection(
        &self,
        group: Option<&GroupId>,
    ) -> Result<InitiativeSelection> {
        let mut rng = StdRng::from_os_rng();
        self.build_initiative_selection_with_rng(group, &mut rng)
            .await
    }

    pub async fn build_initiative_selection_with_rng<R: Rng + ?Sized>(
        &self,
        group: Option<&GroupId>,
        rng: &mut R,
    ) -> Result<InitiativeSelection> {
        let selector = self.selector();
        let candidates = selector.candidates(rng)?;

        let date = self.date_clause();
        let history = self.history_clause(group).await;
        let persona = Persona::choose(rng);
        let base_context = self.assembler.base_context(&date, &history, persona);
        let select_prompt = selector.selection_prompt(&base_context, &candidates);

        info!(
            candidates = candidates.len(),
            ?persona,
            "Built initiative selection"
        );

        Ok(InitiativeSelection {
            select_prompt,
            candidates,
            base_context,
            persona,
        })
    }

    /// Sample the chosen node's memories and build the yes/no check prompt.
    pub fn build_initiative_check(&self, node: &MemoryNode, base_context: &str) -> InitiativeCheck {
        let mut rng = StdRng::from_os_rng();
        self.build_initiative_check_with_rng(node, base_context, &mut rng)
    }

    pub fn build_initiative_check_with_rng<R: Rng + ?Sized>(
        &self,
        node: &MemoryNode,
        base_context: &str,
        rng: &mut R,
    ) -> InitiativeCheck {
        let check = self.selector().check(node, base_context, rng);
        debug!(concept = %node.concept, "Built initiative check");
        check
    }

    /// The speech prompt, reusing the memory sampled for the check.
    pub fn build_initiative_generation(
        &self,
        node: &MemoryNode,
        base_context: &str,
        sampled_memory: &str,
    ) -> String {
        self.selector()
            .generation_prompt(node, base_context, sampled_memory)
    }

    fn selector(&self) -> InitiativeSelector<'_> {
        InitiativeSelector::new(self.graph.as_ref(), self.settings.initiative)
    }

    fn date_clause(&self) -> String {
        let (_, activity) = self.schedule.current_task();
        date_clause(self.clock.now(), &self.schedule.today_schedule(), &activity)
    }

    async fn history_clause(&self, group: Option<&GroupId>) -> String {
        let Some(group) = group else {
            return history_clause(None);
        };
        match self
            .history
            .recent_messages(group, self.settings.max_context_size)
            .await
        {
            Ok(text) => history_clause(Some(&text)),
            Err(e) => {
                warn!(group = %group, error = %e, "Chat history unavailable");
                history_clause(None)
            }
        }
    }
}
