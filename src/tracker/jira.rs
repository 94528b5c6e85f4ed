use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::sprint::{Epic, Task};

use super::{PublishError, Publisher, RemoteId};

/// Connection and project settings for a Jira Cloud site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraSettings {
    /// Site root, e.g. `https://example.atlassian.net`.
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub project_key: String,
    /// Display name written into issue descriptions.
    pub project_name: String,
    /// Set `parent` on tasks so they nest under their epic.
    pub link_parent: bool,
    pub timeout_secs: u64,
}

/// `GET /rest/api/3/myself`
#[derive(Debug, Deserialize)]
struct Myself {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

/// `GET /rest/api/3/project/{key}`
#[derive(Debug, Deserialize)]
struct ProjectSummary {
    name: Option<String>,
}

/// `POST /rest/api/3/issue` (201)
#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

/// Jira Cloud REST v3 client.
pub struct JiraClient {
    client: Client,
    settings: JiraSettings,
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.settings.base_url)
            .field("project_key", &self.settings.project_key)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    pub fn new(settings: JiraSettings) -> Result<Self, PublishError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &JiraSettings {
        &self.settings
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, PublishError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.settings.email, Some(&self.settings.api_token))
            .send()
            .map_err(|e| PublishError::Transport(e.to_string()))?;
        read_json(response, 200)
    }

    fn post_issue(&self, payload: &Value) -> Result<RemoteId, PublishError> {
        let url = self.url("/rest/api/3/issue");
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.settings.email, Some(&self.settings.api_token))
            .json(payload)
            .send()
            .map_err(|e| PublishError::Transport(e.to_string()))?;
        let created: CreatedIssue = read_json(response, 201)?;
        Ok(RemoteId::new(created.key))
    }

    /// Display name of the authenticated user. Used as a connectivity check.
    pub fn myself(&self) -> Result<String, PublishError> {
        let me: Myself = self.get_json("/rest/api/3/myself")?;
        Ok(me.display_name.unwrap_or_else(|| "Unknown".to_string()))
    }

    /// Name of a project the user can access.
    pub fn project(&self, key: &str) -> Result<String, PublishError> {
        let project: ProjectSummary = self.get_json(&format!("/rest/api/3/project/{}", key))?;
        Ok(project.name.unwrap_or_else(|| key.to_string()))
    }
}

impl Publisher for JiraClient {
    fn create_epic(&self, epic: &Epic, sprint_number: u32) -> Result<RemoteId, PublishError> {
        let payload = epic_payload(
            epic,
            sprint_number,
            &self.settings.project_key,
            &self.settings.project_name,
        );
        self.post_issue(&payload).map_err(|e| {
            warn!(epic = %epic.name, error = %e, "epic creation failed");
            e
        })
    }

    fn create_task(&self, task: &Task, parent: &RemoteId) -> Result<RemoteId, PublishError> {
        let payload = task_payload(
            task,
            parent,
            &self.settings.project_key,
            &self.settings.project_name,
            self.settings.link_parent,
        );
        self.post_issue(&payload).map_err(|e| {
            warn!(task = %task.id, error = %e, "task creation failed");
            e
        })
    }

    fn project_key(&self) -> &str {
        &self.settings.project_key
    }
}

fn read_json<T: DeserializeOwned>(response: Response, expected: u16) -> Result<T, PublishError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .map_err(|e| PublishError::Transport(e.to_string()))?;
    if status != expected {
        return Err(PublishError::Http { status, body: text });
    }
    serde_json::from_str(&text).map_err(|e| PublishError::InvalidResponse(e.to_string()))
}

/// Wrap plain text in a single-paragraph Atlassian Document Format document.
pub fn adf_text(text: &str) -> Value {
    json!({
        "type": "doc",
        "version": 1,
        "content": [{
            "type": "paragraph",
            "content": [{ "type": "text", "text": text }]
        }]
    })
}

/// Issue-create payload for an epic.
pub fn epic_payload(epic: &Epic, sprint_number: u32, project_key: &str, project_name: &str) -> Value {
    let text = format!(
        "Epic Goal: {}\n\nSprint: {}\nTotal Tasks: {}\nProject: {}",
        epic.goal,
        epic.sprint,
        epic.tasks.len(),
        project_name
    );
    json!({
        "fields": {
            "project": { "key": project_key },
            "summary": format!("Sprint {}: {}", sprint_number, epic.name),
            "description": adf_text(&text),
            "issuetype": { "name": "Epic" }
        }
    })
}

/// Issue-create payload for a task.
pub fn task_payload(
    task: &Task,
    parent: &RemoteId,
    project_key: &str,
    project_name: &str,
    link_parent: bool,
) -> Value {
    let text = format!(
        "Epic: {}\n\n{}\n\nStory Points: {}\nAssignee: {}\nDuration: {}\nProject: {}",
        parent, task.description, task.story_points, task.assignee, task.duration, project_name
    );
    let mut payload = json!({
        "fields": {
            "project": { "key": project_key },
            "summary": format!("{}: {}", task.id, task.title),
            "description": adf_text(&text),
            "issuetype": { "name": "Task" }
        }
    });
    if link_parent {
        payload["fields"]["parent"] = json!({ "key": parent.as_str() });
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprint::parse_sprint;

    const DOC: &str = "\
# Sprint 3: Core Platform
### Epic 1: Setup
**Goal**: Bootstrap storage
**T3.1** - Init DB
**Story Points**: 5
**Assignee**: Data Team
";

    fn epic() -> Epic {
        parse_sprint(DOC).unwrap().sprint.epics.remove(0)
    }

    #[test]
    fn test_adf_text_shape() {
        let doc = adf_text("hello");
        assert_eq!(doc["type"], "doc");
        assert_eq!(doc["version"], 1);
        assert_eq!(doc["content"][0]["type"], "paragraph");
        assert_eq!(doc["content"][0]["content"][0]["text"], "hello");
    }

    #[test]
    fn test_epic_payload() {
        let payload = epic_payload(&epic(), 3, "SCRUM", "Main project");
        let fields = &payload["fields"];
        assert_eq!(fields["project"]["key"], "SCRUM");
        assert_eq!(fields["summary"], "Sprint 3: Setup");
        assert_eq!(fields["issuetype"]["name"], "Epic");
        assert_eq!(
            fields["description"]["content"][0]["content"][0]["text"],
            "Epic Goal: Bootstrap storage\n\nSprint: Core Platform\nTotal Tasks: 1\nProject: Main project"
        );
    }

    #[test]
    fn test_task_payload() {
        let epic = epic();
        let task = &epic.tasks[0];
        let payload = task_payload(task, &RemoteId::new("SCRUM-7"), "SCRUM", "Main project", false);
        let fields = &payload["fields"];
        assert_eq!(fields["summary"], "T3.1: Init DB");
        assert_eq!(fields["issuetype"]["name"], "Task");
        assert!(fields.get("parent").is_none());

        let text = fields["description"]["content"][0]["content"][0]["text"]
            .as_str()
            .unwrap();
        assert!(text.starts_with("Epic: SCRUM-7\n\n*Epic*: Setup"));
        assert!(text.ends_with(
            "Story Points: 5\nAssignee: Data Team\nDuration: Unknown\nProject: Main project"
        ));
    }

    #[test]
    fn test_task_payload_links_parent() {
        let epic = epic();
        let payload = task_payload(&epic.tasks[0], &RemoteId::new("SCRUM-7"), "SCRUM", "S", true);
        assert_eq!(payload["fields"]["parent"]["key"], "SCRUM-7");
    }

    #[test]
    fn test_response_bodies() {
        let created: CreatedIssue =
            serde_json::from_str(r#"{"id": "10001", "key": "SCRUM-9", "self": "x"}"#).unwrap();
        assert_eq!(created.key, "SCRUM-9");
        assert!(serde_json::from_str::<CreatedIssue>(r#"{"id": "10001"}"#).is_err());

        let me: Myself = serde_json::from_str(r#"{"accountId": "a1"}"#).unwrap();
        assert_eq!(me.display_name, None);
        let me: Myself = serde_json::from_str(r#"{"displayName": "Ada"}"#).unwrap();
        assert_eq!(me.display_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_url_join() {
        let client = JiraClient::new(JiraSettings {
            base_url: "https://example.atlassian.net/".to_string(),
            email: "me@example.com".to_string(),
            api_token: "token".to_string(),
            project_key: "SCRUM".to_string(),
            project_name: "SCRUM".to_string(),
            link_parent: false,
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            client.url("/rest/api/3/myself"),
            "https://example.atlassian.net/rest/api/3/myself"
        );
        assert_eq!(client.project_key(), "SCRUM");
    }
}
