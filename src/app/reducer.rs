//! Dashboard operations as a reducer.
//!
//! [`update`] applies one [`Msg`] to the [`AppState`] and returns at most one
//! [`Command`] for the effects executor. Completions of those commands come
//! back as messages and are applied to whatever the state is when they
//! arrive; two in-flight requests are never coordinated, so the later
//! completion wins.
use crate::directory::{FormField, User, UserForm, UserId, UserRecord};
use crate::error::{DirectoryError, OperationError, Result};

use super::{AppState, FormFocus, InputMode, Modal, RequestId};

/// Which branch of the submit flow a save belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(UserId),
}

/// Everything that can happen to the dashboard.
#[derive(Debug)]
pub enum Msg {
    /// Fetch the whole collection again.
    LoadRequested,
    UsersLoaded {
        request: RequestId,
        result: Result<Vec<User>>,
    },
    SearchChanged(String),
    OpenCreate,
    OpenEdit(User),
    CloseModal,
    FormFieldChanged(FormField, String),
    Submit,
    Saved {
        request: RequestId,
        target: SaveTarget,
        result: Result<UserRecord>,
    },
    DeleteRequested(UserId),
    Deleted {
        request: RequestId,
        id: UserId,
        result: Result<()>,
    },
}

/// A network call the dashboard wants performed.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    FetchUsers {
        request: RequestId,
    },
    CreateUser {
        request: RequestId,
        form: UserForm,
    },
    UpdateUser {
        request: RequestId,
        id: UserId,
        form: UserForm,
    },
    DeleteUser {
        request: RequestId,
        id: UserId,
    },
}

impl Command {
    pub fn request(&self) -> RequestId {
        match self {
            Command::FetchUsers { request }
            | Command::CreateUser { request, .. }
            | Command::UpdateUser { request, .. }
            | Command::DeleteUser { request, .. } => *request,
        }
    }
}

/// Apply `msg` to `app`.
pub fn update(app: &mut AppState, msg: Msg) -> Option<Command> {
    match msg {
        Msg::LoadRequested => Some(Command::FetchUsers {
            request: app.next_request_id(),
        }),
        Msg::UsersLoaded { request, result } => {
            match result {
                Ok(users) => {
                    tracing::info!(%request, count = users.len(), "users loaded");
                    app.users = users;
                    app.clamp_selection();
                }
                Err(err) => fail(app, OperationError::Load, request, &err),
            }
            None
        }
        Msg::SearchChanged(text) => {
            app.search = text;
            app.selected = 0;
            None
        }
        Msg::OpenCreate => {
            open_modal(app, UserForm::default(), Modal::OpenForCreate);
            None
        }
        Msg::OpenEdit(user) => {
            open_modal(app, UserForm::from_user(&user), Modal::OpenForEdit);
            None
        }
        Msg::CloseModal => {
            close_modal(app);
            None
        }
        Msg::FormFieldChanged(field, value) => {
            app.form.set(field, value);
            app.form_hint = None;
            None
        }
        Msg::Submit => submit(app),
        Msg::Saved {
            request,
            target,
            result,
        } => {
            match result {
                Ok(record) => {
                    tracing::info!(%request, ?target, "user saved");
                    apply_saved(app, target, record);
                    app.clamp_selection();
                    app.form = UserForm::default();
                    close_modal(app);
                }
                Err(err) => fail(app, OperationError::Save, request, &err),
            }
            None
        }
        Msg::DeleteRequested(id) => Some(Command::DeleteUser {
            request: app.next_request_id(),
            id,
        }),
        Msg::Deleted {
            request,
            id,
            result,
        } => {
            match result {
                Ok(()) => {
                    tracing::info!(%request, %id, "user deleted");
                    app.users.retain(|u| u.id != id);
                    app.clamp_selection();
                }
                Err(err) => fail(app, OperationError::Delete, request, &err),
            }
            None
        }
    }
}

fn submit(app: &mut AppState) -> Option<Command> {
    if let Err(issue) = app.form.validate() {
        tracing::debug!(?issue, "submit refused");
        app.form_hint = Some(issue);
        return None;
    }
    app.form_hint = None;
    let request = app.next_request_id();
    let mut form = app.form.clone();
    // An email input submits its value without surrounding whitespace.
    form.email = form.email.trim().to_string();
    Some(match form.id.clone() {
        Some(id) => Command::UpdateUser { request, id, form },
        None => Command::CreateUser { request, form },
    })
}

fn apply_saved(app: &mut AppState, target: SaveTarget, record: UserRecord) {
    match target {
        SaveTarget::Update(id) => {
            // Entries are matched on the submitted id; the replacement carries
            // the server's id when the response has one.
            let new_id = record.id.clone().unwrap_or_else(|| id.clone());
            let updated = record.into_user(new_id);
            for user in app.users.iter_mut().filter(|u| u.id == id) {
                *user = updated.clone();
            }
        }
        SaveTarget::Create => {
            let id = app.id_policy.assign(app.users.len(), record.id.clone());
            app.users.push(record.into_user(id));
        }
    }
}

fn open_modal(app: &mut AppState, form: UserForm, modal: Modal) {
    app.form = form;
    app.form_hint = None;
    app.form_focus = FormFocus::Field(FormField::Name);
    app.modal = modal;
    app.input_mode = InputMode::Modal;
}

fn close_modal(app: &mut AppState) {
    app.modal = Modal::Closed;
    if app.input_mode == InputMode::Modal {
        app.input_mode = InputMode::Normal;
    }
}

fn fail(app: &mut AppState, kind: OperationError, request: RequestId, err: &DirectoryError) {
    tracing::warn!(%request, ?kind, error = %err, "operation failed");
    app.errors.report(kind, request);
}
