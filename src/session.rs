/// The signed-in identity, as handed over by the external identity provider.
/// Authentication itself happens outside this crate; stores receive a Viewer
/// instead of reading ambient session state.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Viewer {
    pub fn new(user_id: impl Into<String>) -> Self {
        Viewer {
            user_id: user_id.into(),
            name: None,
            email: None,
        }
    }
}
