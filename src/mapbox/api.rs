use anyhow::{anyhow, Context};
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://api.mapbox.com";
pub const ACCESS_TOKEN_ENV_VAR: &str = "MAPBOX_ACCESS_TOKEN";

/// Connection settings shared by the Mapbox collaborators.
#[derive(Debug, Clone)]
pub struct MapboxApi {
    pub client: reqwest::blocking::Client,
    pub api_base: String,
    pub access_token: String,
    pub username: String,
}

impl MapboxApi {
    /// Build the client. The username is looked up from the token unless given.
    pub fn new(api_base: &str, access_token: &str, username: Option<&str>) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("dataset_to_tileset/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let api_base = api_base.trim_end_matches('/').to_string();
        let username = match username {
            Some(username) => username.to_string(),
            None => resolve_username(&client, &api_base, access_token)?,
        };
        Ok(Self {
            client,
            api_base,
            access_token: access_token.to_string(),
            username,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
    code: String,
    token: Option<TokenClaims>,
}

#[derive(Deserialize, Debug)]
struct TokenClaims {
    u: String,
}

/// Ask the token endpoint which account an access token belongs to.
pub fn resolve_username(
    client: &reqwest::blocking::Client,
    api_base: &str,
    access_token: &str,
) -> anyhow::Result<String> {
    let response = client
        .get(format!("{}/tokens/v2", api_base))
        .query(&[("access_token", access_token)])
        .send()
        .context("Requesting access token details")?
        .error_for_status()?;
    let details: TokenResponse = response.json()?;
    match details.token {
        Some(claims) if details.code == "TokenValid" => Ok(claims.u),
        _ => Err(anyhow!("Access token is not valid ({})", details.code)),
    }
}

pub fn studio_dataset_url(owner: &str, dataset_id: &str) -> String {
    format!(
        "https://www.mapbox.com/studio/datasets/{}/{}/",
        owner, dataset_id
    )
}

pub fn studio_tileset_url(tileset_id: &str) -> String {
    format!("https://www.mapbox.com/studio/tilesets/{}/", tileset_id)
}
