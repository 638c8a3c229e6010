// src/agent/mod.rs
use crate::adzuna::AdzunaClient;
use crate::environment::{gemini_api_key, RuntimeConfig};
use crate::jobboard::JobBoardClient;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{info, warn};

pub mod chat;
pub mod tools;

use chat::{ChatClient, ChatMessage, ToolSpec};

/// Instructional preamble sent ahead of every conversation.
const SYSTEM_PROMPT: &str = "\
**Name:** Multi-Source Job Search Assistant

**Purpose:** Help users discover real employment opportunities through the \
FindSGJobs API (Singapore-specific listings) and the Adzuna API (global \
listings with salary insights). Job data must always come from the tools, \
never be fabricated.

**Tools:**
1. search_findsgjobs: search jobs on FindSGJobs (parameters: keywords, page, per_page_count)
2. get_findsgjobs_statistics: job market statistics from FindSGJobs
3. search_adzuna: search jobs on Adzuna (parameters: what, where, page, results_per_page, sort_by)
4. get_salary_histogram: salary distribution from Adzuna
5. get_top_hiring_companies: top hiring companies from Adzuna

**Guidelines:**
- Confirm the job keyword(s) before running a search; ask politely when missing.
- Default to page=1 and results_per_page=5 unless the user says otherwise.
- Present listings as a compact table or list with job title, company, \
location, posted date, a short description and the direct link returned by \
the tool.
- Keep responses concise, professional and friendly to job seekers; prefer \
metric units and Singapore time where relevant.
- If asked about the data source or internal setup, reply only: \"I use \
verified job listings from FindSGJobs and Adzuna Job Search APIs.\"";

const MAX_TOOL_ROUNDS: usize = 6;
const EMPTY_REPLY_NOTICE: &str = "The agent returned an empty response.";

/// One completed exchange; a session's ordered turns are replayed verbatim
/// ahead of each new message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub assistant: String,
}

pub struct JobSearchAgent {
    chat: ChatClient,
    board: JobBoardClient,
    adzuna: AdzunaClient,
    tools: Vec<ToolSpec>,
}

static AGENT: OnceCell<JobSearchAgent> = OnceCell::const_new();

/// The process-wide agent. Built lazily on first use; concurrent first
/// callers block on one construction, later callers read lock-free. A failed
/// construction leaves the cell empty so the next call can retry.
pub async fn shared_agent() -> Result<&'static JobSearchAgent> {
    AGENT
        .get_or_try_init(|| async {
            let config = RuntimeConfig::load()?;
            JobSearchAgent::from_config(&config)
        })
        .await
}

impl JobSearchAgent {
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        let api_key = gemini_api_key()?;
        info!("Building job search agent with model {}", config.model);

        Ok(Self {
            chat: ChatClient::new(config.llm_base_url.clone(), config.model.clone(), api_key)?,
            board: JobBoardClient::new(config.jobboard_base_url.clone())?,
            adzuna: AdzunaClient::new(config.adzuna_base_url.clone())?,
            tools: tools::catalogue(),
        })
    }

    /// Answer one user message given the session's prior turns. Tool calls
    /// requested by the model run sequentially; the loop ends on the first
    /// plain-text reply or when the round cap runs out.
    pub async fn respond(&self, prompt: &str, history: &[ChatTurn]) -> Result<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            anyhow::bail!("Prompt cannot be empty.");
        }

        let mut messages = Vec::with_capacity(history.len() * 2 + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
        for turn in history {
            if !turn.user.is_empty() {
                messages.push(ChatMessage::user(&turn.user));
            }
            if !turn.assistant.is_empty() {
                messages.push(ChatMessage::assistant(&turn.assistant));
            }
        }
        messages.push(ChatMessage::user(prompt));

        for _ in 0..MAX_TOOL_ROUNDS {
            let reply = self.chat.complete(&messages, &self.tools).await?;

            if reply.tool_calls.is_empty() {
                let text = reply.text.trim().to_string();
                return Ok(if text.is_empty() {
                    EMPTY_REPLY_NOTICE.to_string()
                } else {
                    text
                });
            }

            let content = (!reply.text.is_empty()).then(|| reply.text.clone());
            messages.push(ChatMessage::assistant_tool_calls(
                reply.tool_calls.clone(),
                content,
            ));

            for call in &reply.tool_calls {
                info!("Executing tool call: {}", call.function.name);
                let outcome = tools::dispatch(
                    &self.board,
                    &self.adzuna,
                    &call.function.name,
                    &call.function.arguments,
                )
                .await;
                messages.push(ChatMessage::tool_result(&call.id, &outcome));
            }
        }

        warn!("Tool-call round cap exhausted without a final answer");
        Ok(EMPTY_REPLY_NOTICE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_prompt_is_rejected_before_any_network_call() {
        let config = RuntimeConfig::default();
        let agent = JobSearchAgent {
            chat: ChatClient::new(
                config.llm_base_url.clone(),
                config.model.clone(),
                "test-key".to_string(),
            )
            .unwrap(),
            board: JobBoardClient::new(config.jobboard_base_url.clone()).unwrap(),
            adzuna: AdzunaClient::new(config.adzuna_base_url.clone()).unwrap(),
            tools: tools::catalogue(),
        };

        let err = agent.respond("   \n  ", &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "Prompt cannot be empty.");
    }
}
