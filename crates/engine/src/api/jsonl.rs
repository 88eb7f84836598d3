//! Line-delimited JSON driver.
//!
//! Each input line is one request object tagged by `op`; each output line is
//! the matching response. An optional `id` is echoed back unchanged.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use charforge_domain::{CharacterId, OwnerId};

use super::error_sanitizer::sanitize_error;
use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::character_creation::{
    parse_owner_realm, CharacterCreationError, DraftUpdate, ErrorKind,
};

#[derive(Debug, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub request: Request,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    GetOrCreateDraft {
        owner_id: String,
        realm_id: String,
    },
    StartNewDraft {
        owner_id: String,
        realm_id: String,
    },
    CancelDraft {
        character_id: CharacterId,
    },
    UpdateDraft {
        character_id: CharacterId,
        update: DraftUpdate,
    },
    RollAbilityScores {
        character_id: CharacterId,
    },
    FinalizeDraft {
        character_id: CharacterId,
    },
    ResolveChoices {
        #[serde(default)]
        species_key: Option<String>,
        #[serde(default)]
        class_key: Option<String>,
    },
    ListCategoryOptions {
        category_key: String,
    },
    GetPendingFeatureChoices {
        character_id: CharacterId,
    },
    RecordFeatureChoice {
        character_id: CharacterId,
        feature_key: String,
        value: String,
    },
    GetCharacter {
        character_id: CharacterId,
    },
    ListCharacters {
        owner_id: String,
        #[serde(default)]
        realm_id: Option<String>,
    },
}

impl Request {
    fn name(&self) -> &'static str {
        match self {
            Self::GetOrCreateDraft { .. } => "get_or_create_draft",
            Self::StartNewDraft { .. } => "start_new_draft",
            Self::CancelDraft { .. } => "cancel_draft",
            Self::UpdateDraft { .. } => "update_draft",
            Self::RollAbilityScores { .. } => "roll_ability_scores",
            Self::FinalizeDraft { .. } => "finalize_draft",
            Self::ResolveChoices { .. } => "resolve_choices",
            Self::ListCategoryOptions { .. } => "list_category_options",
            Self::GetPendingFeatureChoices { .. } => "get_pending_feature_choices",
            Self::RecordFeatureChoice { .. } => "record_feature_choice",
            Self::GetCharacter { .. } => "get_character",
            Self::ListCharacters { .. } => "list_characters",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(ErrorBody {
                kind,
                message: message.into(),
            }),
        }
    }
}

/// Handle a single request line.
pub async fn handle_line(app: &App, line: &str) -> Response {
    let envelope: RequestEnvelope = match serde_json::from_str(line) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::debug!(error = %e, "Malformed request line");
            return Response::failure(
                None,
                ErrorKind::InvalidArgument,
                format!("malformed request: {}", e),
            );
        }
    };

    let operation = envelope.request.name();
    tracing::debug!(operation, "Handling request");

    match dispatch(app, envelope.request).await {
        Ok(result) => Response::success(envelope.id, result),
        Err(e) => {
            let kind = e.kind();
            let message = if kind == ErrorKind::Internal {
                sanitize_error(&e, operation)
            } else {
                e.to_string()
            };
            Response::failure(envelope.id, kind, message)
        }
    }
}

async fn dispatch(app: &App, request: Request) -> Result<Value, CharacterCreationError> {
    let uc = &app.use_cases.character_creation;
    match request {
        Request::GetOrCreateDraft { owner_id, realm_id } => {
            to_value(uc.get_or_create_draft.execute(&owner_id, &realm_id).await?)
        }
        Request::StartNewDraft { owner_id, realm_id } => {
            to_value(uc.start_new_draft.execute(&owner_id, &realm_id).await?)
        }
        Request::CancelDraft { character_id } => {
            uc.cancel_draft.execute(character_id).await?;
            Ok(Value::Null)
        }
        Request::UpdateDraft {
            character_id,
            update,
        } => to_value(uc.update_draft.execute(character_id, update).await?),
        Request::RollAbilityScores { character_id } => {
            to_value(uc.roll_ability_scores.execute(character_id).await?)
        }
        Request::FinalizeDraft { character_id } => {
            to_value(uc.finalize.execute(character_id).await?)
        }
        Request::ResolveChoices {
            species_key,
            class_key,
        } => to_value(
            uc.resolve_choices
                .execute(species_key.as_deref(), class_key.as_deref())
                .await?,
        ),
        Request::ListCategoryOptions { category_key } => {
            to_value(uc.list_category_options.execute(&category_key).await?)
        }
        Request::GetPendingFeatureChoices { character_id } => {
            to_value(uc.pending_feature_choices.execute(character_id).await?)
        }
        Request::RecordFeatureChoice {
            character_id,
            feature_key,
            value,
        } => to_value(
            uc.record_feature_choice
                .execute(character_id, &feature_key, &value)
                .await?,
        ),
        Request::GetCharacter { character_id } => {
            let character = app
                .repositories
                .character
                .get(character_id)
                .await?
                .ok_or(CharacterCreationError::CharacterNotFound(character_id))?;
            to_value(character)
        }
        Request::ListCharacters { owner_id, realm_id } => {
            let characters = match realm_id {
                Some(realm_id) => {
                    let (owner_id, realm_id) = parse_owner_realm(&owner_id, &realm_id)?;
                    app.repositories
                        .character
                        .get_by_owner_and_realm(&owner_id, &realm_id)
                        .await?
                }
                None => {
                    let owner_id = OwnerId::new(owner_id).map_err(|e| {
                        CharacterCreationError::invalid_argument(e.to_string())
                    })?;
                    app.repositories.character.get_by_owner(&owner_id).await?
                }
            };
            to_value(characters)
        }
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, CharacterCreationError> {
    serde_json::to_value(value).map_err(|e| RepoError::serialization(e).into())
}

/// Read requests line by line until EOF, writing one response line each.
pub async fn serve<R, W>(app: Arc<App>, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&app, &line).await;
        let mut encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode response");
                continue;
            }
        };
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
