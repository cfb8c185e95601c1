//! Prompt assembly.
//!
//! One invocation produces two prompts from one [`SharedContext`]:
//!
//! 1. **GENERATE**: knowledge, date, chat history, persona clause with the
//!    activation, style modifiers, brevity instruction
//! 2. **GATE**: the same knowledge, date and history, then the same persona
//!    asked for a bare yes/no on whether to reply at all
//!
//! Nothing here draws randomness. Persona and style choices arrive as
//! inputs, so a pair can never disagree about who is speaking.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::persona::{Persona, PersonaProfile, StyleModifier};
use super::tone::Tone;

/// Words that read as someone calling the agent a bot.
pub const BOT_KEYWORDS: [&str; 6] = ["人机", "bot", "机器", "入机", "robot", "机器人"];

pub const BOT_ACCUSATION_DIRECTIVE: &str = "有人说你是人机或者机器人，否定这一事实，攻击或反问他。";

pub const BREVITY_INSTRUCTION: &str = "但是记得回复平淡一些，简短一些，尤其注意在没明确提到时不要过多提及自身的背景，\
记住不要输出多余内容(包括前后缀，冒号和引号，括号，表情等)，只需要输出回复内容就好，不要输出其他任何内容";

const HISTORY_HEADER: &str = "以下是群里正在聊天的内容：";
const NO_HISTORY_PLACEHOLDER: &str = "（现在群里没有消息）";
const CHAT_IN_PROGRESS: &str = "以上是群里正在进行的聊天";
const BROWSING: &str = "你正在浏览qq群";

/// The per-invocation context both prompts of a pair are built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedContext {
    /// Framed knowledge clause, empty when nothing matched
    pub knowledge: String,
    pub date: String,
    pub history: String,
}

/// GENERATE and GATE prompts from one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPair {
    pub generate: String,
    pub gate: String,
}

/// Message-specific inputs of one response build.
#[derive(Debug, Clone, Copy)]
pub struct ResponseInputs<'a> {
    pub sender: &'a str,
    pub text: &'a str,
    pub tone: Tone,
    /// Rendered recall clause, possibly empty
    pub memory_clause: &'a str,
    pub persona: Persona,
    pub styles: &'a [StyleModifier],
}

pub fn date_clause(now: NaiveDateTime, schedule: &str, activity: &str) -> String {
    format!(
        "今天是{}，现在是{}，你今天的日程是：\n{}\n你现在正在{}\n",
        now.format("%Y-%m-%d"),
        now.format("%H:%M:%S"),
        schedule,
        activity
    )
}

/// Wrap retrieved knowledge. Empty knowledge yields an empty clause.
pub fn knowledge_clause(knowledge: &str) -> String {
    if knowledge.is_empty() {
        return String::new();
    }
    let rule = "-".repeat(52);
    format!(
        "\n{rule}\n你有以下这些[知识]：\n{knowledge}\n请你记住上面的[知识]，之后可能会用到，但不要生硬地堆砌\n{rule}\n"
    )
}

/// Recent group chat, or a placeholder when there is no group or no message.
pub fn history_clause(history: Option<&str>) -> String {
    match history.map(str::trim) {
        Some(text) if !text.is_empty() => format!("{HISTORY_HEADER}\n{text}"),
        _ => format!("{HISTORY_HEADER}\n{NO_HISTORY_PLACEHOLDER}"),
    }
}

pub fn activation_clause(memory_clause: &str, sender: &str, text: &str, tone: Tone) -> String {
    format!(
        "{CHAT_IN_PROGRESS}，{memory_clause} 现在昵称为 '{sender}' 的用户说的:{text}。引起了你的注意，你和他{}，你想要{}。",
        tone.relation(),
        tone.directive()
    )
}

/// Case-insensitive bot-accusation check.
pub fn mentions_bot(text: &str) -> bool {
    let lowered = text.to_lowercase();
    BOT_KEYWORDS.iter().any(|k| lowered.contains(k))
}

pub struct PromptAssembler {
    profile: PersonaProfile,
}

impl PromptAssembler {
    pub fn new(profile: PersonaProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &PersonaProfile {
        &self.profile
    }

    pub fn assemble(&self, ctx: &SharedContext, input: &ResponseInputs<'_>) -> PromptPair {
        let generate = format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n",
            ctx.knowledge,
            ctx.date,
            ctx.history,
            self.generation_persona(input),
            StyleModifier::render(input.styles),
            BREVITY_INSTRUCTION
        );
        let gate = format!(
            "{}\n{}\n{}\n{}",
            ctx.knowledge,
            ctx.date,
            ctx.history,
            self.gate_persona(input)
        );
        PromptPair { generate, gate }
    }

    /// Date, history and introduction: the context every initiative prompt opens with.
    pub fn base_context(&self, date: &str, history: &str, persona: Persona) -> String {
        format!(
            "{date}\n{history}\n{CHAT_IN_PROGRESS}。{}",
            self.profile.introduction(persona)
        )
    }

    fn generation_persona(&self, input: &ResponseInputs<'_>) -> String {
        let activation =
            activation_clause(input.memory_clause, input.sender, input.text, input.tone);
        let bot = if mentions_bot(input.text) {
            BOT_ACCUSATION_DIRECTIVE
        } else {
            ""
        };
        let tail = match input.persona {
            Persona::Primary => format!(
                "现在请你给出日常且口语化的回复，平淡一些，尽量简短一些。{bot}\
请注意把握群里的聊天内容，不要刻意突出自身学科背景，不要回复的太有条理，可以有个性。"
            ),
            Persona::Alternate => format!(
                "现在请你给出日常且口语化的回复，请表现你自己的见解，不要一味迎合，尽量简短一些。{bot}\
请你表达自己的见解和观点，可以有个性。"
            ),
        };
        format!(
            "{activation}{}，{BROWSING}。\n{tail}",
            self.profile.introduction(input.persona)
        )
    }

    fn gate_persona(&self, input: &ResponseInputs<'_>) -> String {
        let nickname = self.profile.nickname();
        format!(
            "{}，{BROWSING}。{CHAT_IN_PROGRESS}，昵称为 '{}' 的用户说的:{}。引起了你的注意，你和他{}，你想要{}，\
但是这不一定是合适的时机，请你决定是否要回应这条消息。\
请在把握群里的聊天内容的基础上，综合群内的氛围，例如，和{nickname}相关的话题要积极回复，\
如果是at自己的消息一定要回复，如果自己正在和别人聊天一定要回复，其他话题如果合适搭话也可以回复。\
如果认为应该回复请输出yes，否则输出no，请注意是决定是否需要回复，而不是编写回复内容，\
除了yes和no不要输出任何回复内容。",
            self.profile.introduction(input.persona),
            input.sender,
            input.text,
            input.tone.relation(),
            input.tone.directive()
        )
    }
}
