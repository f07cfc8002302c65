//! The five conversational agents and the workspace they write to.

pub mod business;
pub mod documents;
pub mod prompts;

use crate::config::AgentSettings;
use crate::errors::AppError;
use crate::models::agent::AgentKind;
use crate::services::ModelService;
use crate::store::Workspace;
use log::{error, info};
use serde::Serialize;
use serde_json::Value;

pub struct AgentService {
    model: ModelService,
    settings: AgentSettings,
    workspace: Workspace,
}

impl AgentService {
    pub fn new(model: ModelService, settings: AgentSettings) -> Self {
        Self {
            model,
            settings,
            workspace: Workspace::new(),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Runs one chat turn and returns the agent's JSON reply.
    pub async fn chat(&self, kind: AgentKind, message: &str) -> Result<Value, AppError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::BadRequest("message is required.".to_string()));
        }

        let mut thread = self.workspace.thread(kind).await;
        let reply = match documents::profile(kind) {
            Some(profile) => {
                let reply =
                    documents::turn(&self.model, &self.settings, profile, &mut thread, message)
                        .await?;
                encode(&reply)?
            }
            None => {
                let reply =
                    business::turn(&self.model, &self.settings, &mut thread, message).await?;
                if let Some(final_prompt) = &reply.final_prompt {
                    self.workspace.set_refined_prompt(final_prompt.as_str()).await;
                }
                encode(&reply)?
            }
        };

        info!(
            "{} turn done, {} messages in thread",
            kind.key(),
            thread.messages.len()
        );
        Ok(reply)
    }

    pub async fn reset(&self, kind: AgentKind) {
        self.workspace.clear(kind).await;
        info!("{} conversation reset", kind.key());
    }

    /// Reads the last committed thread, so it never waits on a turn in flight.
    pub fn history(&self, kind: AgentKind) -> Value {
        let thread = self.workspace.committed(kind);
        match documents::profile(kind) {
            Some(profile) => documents::history(profile, &thread),
            None => business::history(&thread),
        }
    }
}

fn encode<T: Serialize>(reply: &T) -> Result<Value, AppError> {
    serde_json::to_value(reply).map_err(|e| {
        error!("agent reply could not be encoded: {}", e);
        AppError::Encoding(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;
    use crate::testing::spawn_fake_model;

    fn service(fake: &crate::testing::FakeModel) -> AgentService {
        AgentService::new(fake.service(), AgentSettings::default())
    }

    #[actix_web::test]
    async fn development_plan_is_created_then_updated() {
        let fake = spawn_fake_model(vec![
            "PROJECT_PLAN: {\"project_name\": \"Gamer Hub\", \"backend\": \"Node\"}\nMESSAGE: Here is your plan.",
            "PROJECT_PLAN: {\"project_name\": \"Gamer Hub\", \"backend\": \"Spring Boot\"}\nMESSAGE: Switched to Spring Boot.",
        ])
        .await;
        let agents = service(&fake);

        let first = agents
            .chat(AgentKind::Development, "Social media platform for gamers")
            .await
            .unwrap();
        assert_eq!(first["response"], "Here is your plan.");
        assert_eq!(first["project_plan"]["backend"], "Node");
        assert_eq!(first["is_initial_plan"], true);

        let second = agents
            .chat(AgentKind::Development, "Use Java Spring Boot instead")
            .await
            .unwrap();
        assert_eq!(second["project_plan"]["backend"], "Spring Boot");
        assert_eq!(second["is_initial_plan"], false);

        let prompts = fake.prompts();
        assert!(prompts[0].contains("Create a comprehensive project plan for this idea: Social media platform for gamers"));
        assert!(prompts[1].contains("CURRENT PROJECT PLAN:"));
        assert!(prompts[1].contains("\"backend\": \"Node\""));
        assert!(prompts[1].contains("User: Social media platform for gamers"));
        assert!(prompts[1].contains("User: Use Java Spring Boot instead"));

        let thread = agents.workspace().thread(AgentKind::Development).await;
        let roles: Vec<Role> = thread.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(thread.output.as_deref(), Some("Switched to Spring Boot."));
    }

    #[actix_web::test]
    async fn functional_agent_repairs_malformed_json() {
        let fake = spawn_fake_model(vec![
            "{\"user_stories\": [\"As a seller\" \"I list crafts\"]}",
            "{\"user_stories\": [\"As a seller I list crafts\"]}\nMESSAGE: Fixed and generated.",
        ])
        .await;
        let agents = service(&fake);

        let reply = agents
            .chat(AgentKind::Functional, "E-commerce platform for handmade crafts")
            .await
            .unwrap();
        assert_eq!(reply["response"], "Fixed and generated.");
        assert_eq!(reply["functional_requirements"]["user_stories"][0], "As a seller I list crafts");
        assert_eq!(reply["is_initial_analysis"], true);

        let prompts = fake.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("The previous JSON was malformed"));
        assert!(prompts[1].contains("\"As a seller\" \"I list crafts\""));
    }

    #[actix_web::test]
    async fn functional_reply_without_json_is_not_retried() {
        let fake = spawn_fake_model(vec!["I cannot do that.", "{\"unused\": true}"]).await;
        let agents = service(&fake);

        let error = agents
            .chat(AgentKind::Functional, "Recipe sharing site")
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "Failed to generate functional requirements");
        assert!(matches!(
            error,
            AppError::Parse {
                source: crate::services::extract::ParseError::NoJson,
                ..
            }
        ));
        assert_eq!(fake.prompts().len(), 1);
    }

    #[actix_web::test]
    async fn functional_update_repairs_with_current_document_in_context() {
        let fake = spawn_fake_model(vec![
            "{\"user_stories\": [\"As a seller I list crafts\"]}\nMESSAGE: Generated.",
            "{\"user_stories\": [\"As a seller I list crafts\" \"As a buyer I keep a wishlist\"]}",
            "{\"user_stories\": [\"As a seller I list crafts\", \"As a buyer I keep a wishlist\"]}\nMESSAGE: Added the wishlist.",
        ])
        .await;
        let agents = service(&fake);

        agents
            .chat(AgentKind::Functional, "E-commerce platform for handmade crafts")
            .await
            .unwrap();
        let update = agents
            .chat(AgentKind::Functional, "Buyers need a wishlist")
            .await
            .unwrap();
        assert_eq!(update["response"], "Added the wishlist.");
        assert_eq!(update["is_initial_analysis"], false);
        assert_eq!(
            update["functional_requirements"]["user_stories"]
                .as_array()
                .unwrap()
                .len(),
            2
        );

        let prompts = fake.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[1].starts_with(prompts::FUNCTIONAL_UPDATE));
        assert!(prompts[1].contains("CURRENT FUNCTIONAL REQUIREMENTS:"));
        assert!(prompts[1].contains("User: Buyers need a wishlist"));
        assert!(prompts[2].starts_with(prompts::FUNCTIONAL_UPDATE));
        assert!(prompts[2].contains("The previous JSON was malformed"));

        let history = agents.history(AgentKind::Functional);
        assert_eq!(history["message_count"], 4);
        assert_eq!(
            history["current_functional_requirements"],
            update["functional_requirements"]
        );
    }

    #[actix_web::test]
    async fn non_functional_update_uses_current_requirements() {
        let fake = spawn_fake_model(vec![
            "{\"performance_requirements\": {\"priority_level\": \"High\"}}",
            "```json\n{\"performance_requirements\": {\"priority_level\": \"High\"}, \"availability_requirements\": {\"specific_metrics\": [\"99.9% uptime\"]}}\n```",
        ])
        .await;
        let agents = service(&fake);

        let first = agents
            .chat(AgentKind::NonFunctional, "High-traffic store for 1M users")
            .await
            .unwrap();
        assert_eq!(first["response"], "Non-functional requirements generated successfully!");

        let second = agents
            .chat(AgentKind::NonFunctional, "Need 99.9% uptime")
            .await
            .unwrap();
        assert_eq!(second["response"], "Non-functional requirements updated successfully!");
        assert_eq!(
            second["non_functional_requirements"]["availability_requirements"]["specific_metrics"][0],
            "99.9% uptime"
        );

        let prompts = fake.prompts();
        assert!(prompts[1].contains("CURRENT NON-FUNCTIONAL REQUIREMENTS:"));
        assert!(prompts[1].contains("\"priority_level\": \"High\""));
    }

    #[test]
    fn unencodable_reply_is_an_error() {
        struct Broken;

        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("reply cannot be encoded"))
            }
        }

        let error = encode(&Broken).unwrap_err();
        assert!(matches!(error, AppError::Encoding(_)));
        assert_eq!(error.to_string(), "Failed to encode reply");
    }

    #[actix_web::test]
    async fn functional_agent_gives_up_after_repair_attempts() {
        let fake = spawn_fake_model(vec!["{\"a\": [}", "{\"a\": [}", "{\"a\": [}"]).await;
        let agents = service(&fake);

        let error = agents
            .chat(AgentKind::Functional, "Inventory tracker")
            .await
            .unwrap_err();
        assert!(error.to_string().contains("after 3 attempts"));
        assert!(agents.workspace().thread(AgentKind::Functional).await.is_empty());
    }

    #[actix_web::test]
    async fn non_functional_agent_falls_back_to_baseline() {
        let fake = spawn_fake_model(vec![
            "Sorry, I cannot produce JSON today.",
            "still not json",
        ])
        .await;
        let agents = service(&fake);

        let first = agents
            .chat(AgentKind::NonFunctional, "High-traffic store for 1M users")
            .await
            .unwrap();
        assert_eq!(
            first["non_functional_requirements"]["security_requirements"]["priority_level"],
            "Critical"
        );
        assert!(first["response"]
            .as_str()
            .unwrap()
            .starts_with("Generated basic requirements"));

        let second = agents
            .chat(AgentKind::NonFunctional, "Need 99.9% uptime")
            .await
            .unwrap();
        assert_eq!(
            second["non_functional_requirements"],
            first["non_functional_requirements"]
        );
        assert!(second["response"]
            .as_str()
            .unwrap()
            .starts_with("Update failed due to JSON parsing error"));
    }

    #[actix_web::test]
    async fn failed_turn_leaves_thread_untouched() {
        let fake = spawn_fake_model(vec![]).await;
        let agents = service(&fake);

        let error = agents
            .chat(AgentKind::Validator, "Drone delivery for farms")
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "Failed to generate validation report");

        let history = agents.history(AgentKind::Validator);
        assert_eq!(history["message_count"], 0);
        assert!(history["current_validation_report"].is_null());
    }

    #[actix_web::test]
    async fn business_consultation_hands_off_refined_prompt() {
        let fake = spawn_fake_model(vec![
            "What a lovely bakery idea!",
            "{\"question\": \"Who are your main customers?\", \"options\": [\"Students\", \"Families\", \"Offices\", \"Tourists\"]}",
            "CONTINUE",
            "{\"question\": \"How will you sell?\", \"options\": [\"Storefront\", \"Online\", \"Wholesale\"]}",
            "COMPLETE",
            "Congratulations, your plan is ready!",
        ])
        .await;
        let agents = service(&fake);

        let first = agents
            .chat(AgentKind::Business, "A neighbourhood bakery")
            .await
            .unwrap();
        assert_eq!(first["satisfied"], false);
        assert_eq!(first["options"][1], "Families");
        assert!(first["response"]
            .as_str()
            .unwrap()
            .ends_with("Who are your main customers?"));

        let second = agents.chat(AgentKind::Business, "2").await.unwrap();
        assert_eq!(second["response"], "How will you sell?");
        assert_eq!(second["options"].as_array().unwrap().len(), 3);

        let third = agents.chat(AgentKind::Business, "1").await.unwrap();
        assert_eq!(third["satisfied"], true);
        assert_eq!(third["response"], "Congratulations, your plan is ready!");
        let final_prompt = third["final_prompt"].as_str().unwrap();
        assert!(final_prompt.contains("User: Families"));
        assert!(final_prompt.contains("User: Storefront"));

        assert_eq!(
            agents.workspace().refined_prompt().await.as_deref(),
            Some(final_prompt)
        );
        let history = agents.history(AgentKind::Business);
        assert_eq!(history["satisfied"], true);
        assert_eq!(history["message_count"], 6);
    }

    #[actix_web::test]
    async fn business_stops_asking_at_question_limit() {
        let fake = spawn_fake_model(vec![
            "Great idea.",
            "{\"question\": \"Budget?\", \"options\": [\"Small\", \"Medium\", \"Large\"]}",
            "Well done!",
        ])
        .await;
        let agents = AgentService::new(
            fake.service(),
            AgentSettings {
                max_questions: 1,
                ..AgentSettings::default()
            },
        );

        agents.chat(AgentKind::Business, "Food truck").await.unwrap();
        let reply = agents.chat(AgentKind::Business, "3").await.unwrap();
        assert_eq!(reply["satisfied"], true);

        // no completeness check was needed
        assert_eq!(fake.prompts().len(), 3);
    }

    #[actix_web::test]
    async fn business_rejects_question_with_too_few_options() {
        let fake = spawn_fake_model(vec![
            "Great idea.",
            "{\"question\": \"Budget?\", \"options\": [\"Small\"]}",
        ])
        .await;
        let agents = service(&fake);

        let error = agents
            .chat(AgentKind::Business, "Food truck")
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Parse { .. }));
        assert!(agents.workspace().thread(AgentKind::Business).await.is_empty());
    }

    #[actix_web::test]
    async fn blank_message_is_rejected() {
        let fake = spawn_fake_model(vec![]).await;
        let agents = service(&fake);
        let error = agents.chat(AgentKind::Functional, "   ").await.unwrap_err();
        assert!(matches!(error, AppError::BadRequest(_)));
        assert!(fake.prompts().is_empty());
    }
}
