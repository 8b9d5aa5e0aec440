use workflow::Workflow;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) workflow: Workflow,
    pub(crate) bot_token: String,
}
