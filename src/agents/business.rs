use super::prompts;
use crate::config::AgentSettings;
use crate::errors::AppError;
use crate::models::chat::ChatMessage;
use crate::services::extract::{self, Question};
use crate::services::ModelService;
use crate::store::Thread;
use log::{error, info};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct BusinessReply {
    pub response: String,
    pub satisfied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

pub fn history(thread: &Thread) -> Value {
    let final_prompt = thread
        .document
        .as_ref()
        .and_then(|document| document.get("final_prompt"))
        .cloned()
        .unwrap_or(Value::Null);
    let satisfied = !final_prompt.is_null();
    json!({
        "conversation_history": thread.messages,
        "final_prompt": final_prompt,
        "satisfied": satisfied,
        "message_count": thread.messages.len(),
    })
}

pub async fn turn(
    model: &ModelService,
    settings: &AgentSettings,
    thread: &mut Thread,
    message: &str,
) -> Result<BusinessReply, AppError> {
    let opening = thread.is_empty();
    let content = if opening {
        message.to_string()
    } else {
        extract::resolve_choice(message, &thread.options)
    };
    thread.push(ChatMessage::user(content));

    let result = if opening {
        open(model, thread, message).await
    } else {
        follow_up(model, settings, thread).await
    };
    if result.is_err() {
        thread.retract_user();
    }
    result
}

async fn open(
    model: &ModelService,
    thread: &mut Thread,
    idea: &str,
) -> Result<BusinessReply, AppError> {
    let intro = model
        .generate(&prompts::business_opening(idea))
        .await
        .map_err(|e| AppError::model("Failed to generate introduction", e))?;
    let question = next_question(model, &thread.messages).await?;

    let response = format!("{}\n\n{}", intro, question.question);
    ask(thread, &question, Some(intro.as_str()));
    thread.set_output(response.as_str());

    Ok(BusinessReply {
        response,
        satisfied: false,
        final_prompt: None,
        options: Some(question.options),
    })
}

async fn follow_up(
    model: &ModelService,
    settings: &AgentSettings,
    thread: &mut Thread,
) -> Result<BusinessReply, AppError> {
    let out_of_questions = thread.questions_asked >= settings.max_questions;
    if out_of_questions || is_complete(model, &thread.messages).await? {
        let final_prompt = prompts::business_plan(&thread.messages);
        let closing = model
            .generate(prompts::BUSINESS_CLOSING)
            .await
            .map_err(|e| AppError::model("Failed to generate closing message", e))?;

        info!(
            "business consultation complete after {} questions",
            thread.questions_asked
        );
        thread.push(ChatMessage::assistant(closing.as_str()));
        thread.options.clear();
        thread.set_output(closing.as_str());
        thread.set_document(json!({ "final_prompt": final_prompt }));

        return Ok(BusinessReply {
            response: closing,
            satisfied: true,
            final_prompt: Some(final_prompt),
            options: None,
        });
    }

    let question = next_question(model, &thread.messages).await?;
    ask(thread, &question, None);
    thread.set_output(question.question.as_str());

    Ok(BusinessReply {
        response: question.question,
        satisfied: false,
        final_prompt: None,
        options: Some(question.options),
    })
}

fn ask(thread: &mut Thread, question: &Question, preface: Option<&str>) {
    let numbered = extract::format_options(question);
    let content = match preface {
        Some(preface) => format!("{}\n\n{}", preface, numbered),
        None => numbered,
    };
    thread.push(ChatMessage::assistant(content));
    thread.options = question.options.clone();
    thread.questions_asked += 1;
}

async fn is_complete(model: &ModelService, messages: &[ChatMessage]) -> Result<bool, AppError> {
    let verdict = model
        .generate(&prompts::business_completeness(messages))
        .await
        .map_err(|e| AppError::model("Failed to analyze conversation", e))?
        .to_uppercase();
    Ok(verdict.contains("COMPLETE") && !verdict.contains("INCOMPLETE"))
}

async fn next_question(
    model: &ModelService,
    messages: &[ChatMessage],
) -> Result<Question, AppError> {
    let text = model
        .generate(&prompts::business_question(messages))
        .await
        .map_err(|e| AppError::model("Failed to generate next question", e))?;
    extract::parse_question(&text).map_err(|e| {
        error!("question reply could not be parsed: {}", e);
        AppError::parse("Invalid question format from model", e)
    })
}
