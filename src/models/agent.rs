use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Business,
    Functional,
    NonFunctional,
    Development,
    Validator,
}

impl AgentKind {
    pub const COUNT: usize = 5;

    pub const ALL: [AgentKind; 5] = [
        AgentKind::Business,
        AgentKind::Functional,
        AgentKind::NonFunctional,
        AgentKind::Development,
        AgentKind::Validator,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> &'static str {
        match self {
            AgentKind::Business => "business",
            AgentKind::Functional => "functional",
            AgentKind::NonFunctional => "non_functional",
            AgentKind::Development => "development",
            AgentKind::Validator => "validator",
        }
    }

    /// Path prefix the agent is mounted under.
    pub fn path(self) -> &'static str {
        match self {
            AgentKind::Business => "/business",
            AgentKind::Functional => "/functional",
            AgentKind::NonFunctional => "/non-functional",
            AgentKind::Development => "/development",
            AgentKind::Validator => "/validator",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AgentKind::Business => "Business Setup Chatbot",
            AgentKind::Functional => "Smart Functional Requirements Analyzer",
            AgentKind::NonFunctional => "Smart Non-Functional Requirements Analyzer",
            AgentKind::Development => "Smart Project Planner",
            AgentKind::Validator => "Smart Project Validator",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_declaration_order() {
        for (position, kind) in AgentKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), position);
        }
    }

    #[test]
    fn serializes_as_snake_case() {
        let value = serde_json::to_value(AgentKind::NonFunctional).unwrap();
        assert_eq!(value, "non_functional");
        assert_eq!(AgentKind::NonFunctional.key(), "non_functional");
    }
}
