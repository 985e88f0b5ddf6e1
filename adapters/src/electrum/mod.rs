//! Electrum wallet command family.
//!
//! All methods use positional parameters except `payto`, which Electrum only
//! accepts with named parameters. The shape of `getprivatekeys` depends on
//! the server's [`ProtocolRevision`]; only the matching command type is
//! registered, so the other one is rejected before anything is sent.

pub mod client;
pub mod commands;
pub mod decode;

use registry::{CommandRegistry, ParamConvention, RegistryBuilder, RegistryError};
use types::ProtocolRevision;

pub use client::ElectrumClient;
pub use commands::{
    BroadcastCmd, GetFeeRateCmd, GetPrivateKeysCmd, GetPrivateKeysListCmd, GetUnusedAddressCmd,
    ListUnspentCmd, PayToCmd,
};

/// Add the Electrum commands for `revision` to `builder`.
pub fn register(
    builder: &mut RegistryBuilder,
    revision: ProtocolRevision,
) -> Result<(), RegistryError> {
    use ParamConvention::{Named, Positional};

    builder.register::<GetUnusedAddressCmd>("getunusedaddress", Positional)?;
    if revision.lists_private_key_addresses() {
        builder.register::<GetPrivateKeysListCmd>("getprivatekeys", Positional)?;
    } else {
        builder.register::<GetPrivateKeysCmd>("getprivatekeys", Positional)?;
    }
    builder
        .register::<GetFeeRateCmd>("getfeerate", Positional)?
        .register::<PayToCmd>("payto", Named)?
        .register::<ListUnspentCmd>("listunspent", Positional)?
        .register::<BroadcastCmd>("broadcast", Positional)?;
    tracing::debug!(revision = %revision, "registered electrum commands");
    Ok(())
}

/// A frozen registry holding only the Electrum commands for `revision`.
pub fn registry(revision: ProtocolRevision) -> Result<CommandRegistry, RegistryError> {
    let mut builder = RegistryBuilder::new();
    register(&mut builder, revision)?;
    Ok(builder.build())
}
