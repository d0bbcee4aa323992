//! GLS directory and login client.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::DirectoryConfig;

use super::xml::{blocks_of, child_texts, escape_text, strip_namespaces, text_of};
use super::{
    AuthError, DataCenter, LoginResult, Subscription, World, WorldAddresses, WorldStatus,
};

const SOAP_ACTION_GET_DATACENTERS: &str = "http://www.turbine.com/SE/GLS/GetDatacenters";
const SOAP_ACTION_LOGIN_ACCOUNT: &str = "http://www.turbine.com/SE/GLS/LoginAccount";

/// Client for the GLS directory and auth services.
pub struct GlsClient {
    client: Client,
    config: DirectoryConfig,
}

impl GlsClient {
    /// Create a new GLS client.
    pub fn new(config: DirectoryConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Query the directory service for the data centers of a game.
    pub async fn query_datacenters(&self, game: &str) -> Result<Vec<DataCenter>, AuthError> {
        debug!("Querying data centers for {}", game);
        let envelope = datacenters_envelope(game);

        let response = self
            .client
            .post(&self.config.datacenter_url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", SOAP_ACTION_GET_DATACENTERS)
            .body(envelope)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(AuthError::ServiceError { status });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::ConnectionFailed(e.to_string()))?;
        let datacenters = parse_datacenters(&body)?;
        debug!("Directory advertised {} data center(s)", datacenters.len());
        Ok(datacenters)
    }

    /// Query a world's status endpoint for its login server and queue URL lists.
    pub async fn world_status(&self, world: &World) -> Result<WorldStatus, AuthError> {
        let response = self
            .client
            .get(&world.status_server_url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(AuthError::ServiceError { status });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::ConnectionFailed(e.to_string()))?;
        parse_world_status(&body, &world.name)
    }

    /// Log an account in and bind it to a world.
    ///
    /// HTTP 500 from the auth server means the credentials were rejected;
    /// every other non-200 status is a generic service failure.
    pub async fn login(
        &self,
        datacenter: &DataCenter,
        world: &World,
        username: &str,
        password: &str,
    ) -> Result<LoginResult, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let envelope = login_envelope(username, password);
        let response = self
            .client
            .post(&datacenter.auth_server_url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", SOAP_ACTION_LOGIN_ACCOUNT)
            .body(envelope)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        if status == 500 {
            return Err(AuthError::InvalidCredentials);
        }
        if status != 200 {
            return Err(AuthError::ServiceError { status });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::ConnectionFailed(e.to_string()))?;
        let (ticket, subscriptions) = parse_login_response(&body)?;

        let subscription = subscriptions
            .into_iter()
            .find(|s| s.game == datacenter.game_name)
            .ok_or_else(|| AuthError::NoSubscription(datacenter.game_name.clone()))?;

        let world_status = self.world_status(world).await?;
        let addresses = WorldAddresses {
            login_server: world_status
                .primary_login_server()
                .ok_or(AuthError::WorldUnavailable {
                    world: world.name.clone(),
                    what: "login servers",
                })?
                .to_string(),
            chat_server: world.chat_server_url.clone(),
            queue_url: world_status
                .primary_queue_url()
                .ok_or(AuthError::WorldUnavailable {
                    world: world.name.clone(),
                    what: "queue URLs",
                })?
                .to_string(),
        };

        info!(
            "Logged in {} on {} (subscription {})",
            username, world.name, subscription.name
        );
        Ok(LoginResult::new(
            ticket,
            subscription,
            addresses,
            datacenter.game_name.clone(),
        ))
    }
}

fn map_transport_error(e: reqwest::Error) -> AuthError {
    if e.is_timeout() {
        AuthError::Timeout
    } else {
        AuthError::ConnectionFailed(e.to_string())
    }
}

fn datacenters_envelope(game: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema">
<soap:Body>
<GetDatacenters xmlns="http://www.turbine.com/SE/GLS">
  <game>{}</game>
</GetDatacenters>
</soap:Body>
</soap:Envelope>
"#,
        escape_text(game)
    )
}

fn login_envelope(username: &str, password: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <LoginAccount xmlns="http://www.turbine.com/SE/GLS">
      <username>{}</username>
      <password>{}</password>
      <additionalInfo></additionalInfo>
    </LoginAccount>
  </soap:Body>
</soap:Envelope>
"#,
        escape_text(username),
        escape_text(password)
    )
}

fn parse_datacenters(raw: &str) -> Result<Vec<DataCenter>, AuthError> {
    let doc = strip_namespaces(raw);

    let mut datacenters = Vec::new();
    for block in blocks_of(&doc, "Datacenter") {
        let game_name = text_of(&block, "Name").ok_or(AuthError::MissingField("Name"))?;
        let auth_server_url =
            text_of(&block, "AuthServer").ok_or(AuthError::MissingField("AuthServer"))?;
        let patch_server_url = text_of(&block, "PatchServer").unwrap_or_default();
        let launcher_config_url =
            text_of(&block, "LauncherConfigurationServer").unwrap_or_default();

        let mut worlds = Vec::new();
        if let Some(worlds_block) = text_of(&block, "Worlds") {
            for world_block in blocks_of(&worlds_block, "World") {
                worlds.push(parse_world(&world_block)?);
            }
        }

        datacenters.push(DataCenter {
            game_name,
            auth_server_url,
            patch_server_url,
            launcher_config_url,
            worlds,
        });
    }

    Ok(datacenters)
}

fn parse_world(block: &str) -> Result<World, AuthError> {
    let name = text_of(block, "Name").ok_or(AuthError::MissingField("World/Name"))?;
    let login_server_url =
        text_of(block, "LoginServerUrl").ok_or(AuthError::MissingField("LoginServerUrl"))?;
    let chat_server_url =
        text_of(block, "ChatServerUrl").ok_or(AuthError::MissingField("ChatServerUrl"))?;
    let status_server_url =
        text_of(block, "StatusServerUrl").ok_or(AuthError::MissingField("StatusServerUrl"))?;
    let language = text_of(block, "Language");

    Ok(World {
        name,
        login_server_url,
        chat_server_url,
        status_server_url,
        language,
    })
}

fn parse_world_status(raw: &str, world_name: &str) -> Result<WorldStatus, AuthError> {
    let doc = strip_namespaces(raw);

    let login_servers = split_server_list(
        &text_of(&doc, "loginservers").ok_or(AuthError::MissingField("loginservers"))?,
    );
    if login_servers.is_empty() {
        return Err(AuthError::WorldUnavailable {
            world: world_name.to_string(),
            what: "login servers",
        });
    }

    let queue_urls = split_server_list(
        &text_of(&doc, "queueurls").ok_or(AuthError::MissingField("queueurls"))?,
    );
    if queue_urls.is_empty() {
        return Err(AuthError::WorldUnavailable {
            world: world_name.to_string(),
            what: "queue URLs",
        });
    }

    Ok(WorldStatus {
        login_servers,
        queue_urls,
    })
}

/// Split a semicolon-separated server list, dropping empty entries.
fn split_server_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_login_response(raw: &str) -> Result<(String, Vec<Subscription>), AuthError> {
    let doc = strip_namespaces(raw);
    let result = text_of(&doc, "LoginAccountResult")
        .ok_or(AuthError::MissingField("LoginAccountResult"))?;

    let ticket = text_of(&result, "Ticket").ok_or(AuthError::MissingField("Ticket"))?;

    let mut subscriptions = Vec::new();
    for block in blocks_of(&result, "GameSubscription") {
        let game = text_of(&block, "Game").ok_or(AuthError::MissingField("Game"))?;
        let name = text_of(&block, "Name").ok_or(AuthError::MissingField("Subscription/Name"))?;
        let description = text_of(&block, "Description");
        let status = text_of(&block, "Status");
        let product_tokens = text_of(&block, "ProductTokens")
            .map(|tokens| child_texts(&tokens))
            .unwrap_or_default();

        subscriptions.push(Subscription {
            name,
            game,
            description,
            status,
            product_tokens,
        });
    }

    Ok((ticket, subscriptions))
}
