//! Launch argument builder for the native client.

use crate::gls::LoginResult;

use super::InvalidLoginResultError;

const SUPPORT_URL: &str = "https://tss.turbine.com/TSSTrowser/trowser.aspx";
const SUPPORT_SERVICE_URL: &str = "https://tss.turbine.com/TSSTrowser/SubmitTicket.asmx";
const AUTH_SERVER_URL: &str = "https://gls.ddo.com/GLS.AuthServer/Service.asmx";
const GLS_TICKET_LIFETIME: &str = "21600";

/// Per-instance values merged into the argument list.
#[derive(Debug, Clone)]
pub struct LaunchOverrides {
    /// Outbound port assigned to this instance.
    pub outbound_port: u16,
    /// Display language tag.
    pub language: String,
}

/// The ordered argument list handed to the native client.
///
/// Arguments are discrete argv tokens; they are passed to the spawn as a
/// vector and never joined into a shell string. The client is picky about
/// argument order, so the sequence below is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    args: Vec<String>,
}

impl LaunchSpec {
    /// Build the argument list for a served login.
    ///
    /// Building is deterministic: the same login and overrides always yield
    /// an identical sequence, and every build returns a fresh vector.
    pub fn build(
        login: &LoginResult,
        overrides: &LaunchOverrides,
    ) -> Result<Self, InvalidLoginResultError> {
        if !login.has_ticket() {
            return Err(InvalidLoginResultError);
        }

        let mut args = Vec::with_capacity(24);
        push_pair(&mut args, "-h", &login.world().login_server);
        push_pair(&mut args, "-a", &login.subscription().name);
        push_pair(&mut args, "--glsticketdirect", login.ticket());
        push_pair(&mut args, "--chatserver", &login.world().chat_server);
        push_pair(&mut args, "--rodat", "on");
        push_pair(&mut args, "--gametype", login.game_name());
        push_pair(&mut args, "--supporturl", SUPPORT_URL);
        push_pair(&mut args, "--supportserviceurl", SUPPORT_SERVICE_URL);
        push_pair(&mut args, "--authserverurl", AUTH_SERVER_URL);
        push_pair(&mut args, "--glsticketlifetime", GLS_TICKET_LIFETIME);
        push_pair(&mut args, "--outport", &overrides.outbound_port.to_string());
        push_pair(&mut args, "--language", &overrides.language);

        Ok(Self { args })
    }

    /// The argument tokens in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

fn push_pair(args: &mut Vec<String>, flag: &str, value: &str) {
    args.push(flag.to_string());
    args.push(value.to_string());
}
