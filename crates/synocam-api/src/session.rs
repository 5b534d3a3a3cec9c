// Session management
//
// sid-based login/logout against `SYNO.API.Auth` and API discovery via
// `SYNO.API.Info`. The login endpoint returns a session token which is
// stored on the client and appended to every subsequent request.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{API_AUTH, API_INFO, SCRIPT_AUTH, SCRIPT_ENTRY, SurveillanceClient};
use crate::error::Error;
use crate::models::{ApiInfoMap, LoginData};

/// Scope name for Surveillance Station sessions. Tokens issued under one
/// session name are not valid for another DSM application.
const SESSION_NAME: &str = "SurveillanceStation";

impl SurveillanceClient {
    /// Authenticate with the DiskStation using account/password.
    ///
    /// `GET /webapi/auth.cgi?api=SYNO.API.Auth&method=Login&version=6`
    /// with `session=SurveillanceStation&format=sid`. On success the sid
    /// is stored and used for all subsequent requests.
    pub async fn login(&self, account: &str, password: &SecretString) -> Result<(), Error> {
        let params = [
            ("account", account.to_owned()),
            ("passwd", password.expose_secret().to_owned()),
            ("session", SESSION_NAME.to_owned()),
            ("format", "sid".to_owned()),
        ];

        let url = self.build_url_no_sid(SCRIPT_AUTH, API_AUTH, "Login", &params)?;
        debug!(account, "logging in");

        let data: LoginData = self.call_url(url).await?;
        self.set_sid(data.sid);
        debug!("login successful");
        Ok(())
    }

    /// End the current session. The sid is cleared even if the station
    /// rejects the logout (an expired token is gone either way).
    pub async fn logout(&self) -> Result<(), Error> {
        if !self.is_logged_in() {
            return Ok(());
        }

        let params = [("session", SESSION_NAME.to_owned())];
        let url = self.build_url(SCRIPT_AUTH, API_AUTH, "Logout", &params)?;
        self.clear_sid();

        debug!("logging out");
        let result: Result<serde_json::Value, Error> = self.call_url(url).await;
        match result {
            Ok(_) | Err(Error::SessionExpired) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Query which APIs the station exposes and at which versions.
    ///
    /// `SYNO.API.Info` `Query` needs no session and is useful as a
    /// reachability probe before login.
    pub async fn api_info(&self) -> Result<ApiInfoMap, Error> {
        let params = [(
            "query",
            "SYNO.API.Auth,SYNO.SurveillanceStation.".to_owned(),
        )];
        let url = self.build_url_no_sid(SCRIPT_ENTRY, API_INFO, "Query", &params)?;
        self.call_url(url).await
    }
}
