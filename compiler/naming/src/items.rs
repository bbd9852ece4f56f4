//! Names of everything emitted for a service and its methods.

use config::ReservedNames;
use descriptor::{MethodUnit, ServiceUnit};

use crate::ident;

/// Identifiers emitted for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceItems {
    /// Service name as prost/tonic spell the type, e.g. `Bank`
    pub type_name: String,
    /// Prefix for the generated functions, e.g. `bank`
    pub prefix: String,
    /// Subcommand name, e.g. `bank`
    pub command_name: String,
    /// tonic client module, e.g. `bank_client`
    pub client_module: String,
    /// tonic server module, e.g. `bank_server`
    pub server_module: String,
    /// tonic client type, e.g. `BankClient`
    pub client_type: String,
    /// `BankClientCommandConfig`
    pub config_type: String,
    /// `BankClientHandle`
    pub handle_type: String,
    /// `bank_client_command`
    pub command_fn: String,
    /// `run_bank_client_command`
    pub run_fn: String,
    /// `_dial_bank`
    pub dial_fn: String,
    /// `_bank_round_trip`
    pub round_trip_fn: String,
}

impl ServiceItems {
    /// Names for `service`.
    pub fn new(service: &ServiceUnit, reserved: &ReservedNames) -> Self {
        let type_name = ident::upper_camel(&service.name, reserved);
        let prefix = ident::snake_fragment(&service.name);
        let module = ident::tonic_module(&service.name);
        Self {
            command_name: ident::command_name(&service.name),
            client_module: format!("{module}_client"),
            server_module: format!("{module}_server"),
            client_type: format!("{type_name}Client"),
            config_type: format!("{type_name}ClientCommandConfig"),
            handle_type: format!("{type_name}ClientHandle"),
            command_fn: format!("{prefix}_client_command"),
            run_fn: format!("run_{prefix}_client_command"),
            dial_fn: format!("_dial_{prefix}"),
            round_trip_fn: format!("_{prefix}_round_trip"),
            type_name,
            prefix,
        }
    }

    /// Every module-level identifier these items occupy.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        [
            &self.type_name,
            &self.client_module,
            &self.server_module,
            &self.config_type,
            &self.handle_type,
            &self.command_fn,
            &self.run_fn,
            &self.dial_fn,
            &self.round_trip_fn,
        ]
        .into_iter()
        .map(String::as_str)
    }
}

/// Identifiers emitted for one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodItems {
    /// Client method as tonic spells it, e.g. `multi_get` or `r#type`
    pub rpc: String,
    /// Subcommand name, e.g. `multiget`
    pub command_name: String,
    /// `bank_deposit_client_command`
    pub command_fn: String,
    /// `_bank_deposit_run`
    pub run_fn: String,
    /// `_bank_deposit_call`
    pub call_fn: String,
}

impl MethodItems {
    /// Names for `method` of the service named by `service`.
    pub fn new(service: &ServiceItems, method: &MethodUnit, reserved: &ReservedNames) -> Self {
        let fragment = ident::snake_fragment(&method.name);
        let prefix = &service.prefix;
        Self {
            rpc: ident::snake(&method.name, reserved),
            command_name: ident::command_name(&method.name),
            command_fn: format!("{prefix}_{fragment}_client_command"),
            run_fn: format!("_{prefix}_{fragment}_run"),
            call_fn: format!("_{prefix}_{fragment}_call"),
        }
    }

    /// Every module-level identifier these items occupy.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        [&self.command_fn, &self.run_fn, &self.call_fn].into_iter().map(String::as_str)
    }
}
