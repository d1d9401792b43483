use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const USER_AGENT: &str = concat!("fpl_terminal/", env!("CARGO_PKG_VERSION"));

static CLIENT: OnceCell<Client> = OnceCell::new();

// No timeout override: a slow upstream blocks the caller with the client's defaults.
pub fn http_client() -> reqwest::Result<&'static Client> {
    CLIENT.get_or_try_init(|| Client::builder().user_agent(USER_AGENT).build())
}
