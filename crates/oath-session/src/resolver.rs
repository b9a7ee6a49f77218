//! # Role Resolver
//!
//! Maps a wallet address to exactly one portal role from the three on-chain
//! membership registries. All three predicates must answer; a partial result
//! never yields a role.

use crate::errors::SessionError;
use oath_contract::ContractClient;
use oath_types::{Address, Role};
use tracing::{debug, instrument, warn};

/// Resolves the portal role for `address` from on-chain membership.
///
/// The three membership predicates run concurrently. The first match in
/// priority order Manufacturer > Pharmacy > Doctor wins; an address enrolled
/// in none is a [`Role::Patient`]. If any predicate fails the whole
/// resolution fails, so a flaky query can never demote (or promote) an
/// account.
#[instrument(skip(client), fields(address = %address))]
pub async fn resolve_role(
    client: &ContractClient,
    address: Address,
) -> Result<Role, SessionError> {
    let (manufacturer, pharmacy, doctor) = tokio::join!(
        client.is_manufacturer(address),
        client.is_pharmacy(address),
        client.is_doctor(address),
    );

    let manufacturer = manufacturer.map_err(|source| SessionError::RoleResolutionFailed { source })?;
    let pharmacy = pharmacy.map_err(|source| SessionError::RoleResolutionFailed { source })?;
    let doctor = doctor.map_err(|source| SessionError::RoleResolutionFailed { source })?;

    let flagged = u8::from(manufacturer) + u8::from(pharmacy) + u8::from(doctor);
    if flagged > 1 {
        warn!(
            address = %address,
            manufacturer,
            pharmacy,
            doctor,
            "address enrolled in multiple registries; taking highest-priority role"
        );
    }

    let role = if manufacturer {
        Role::Manufacturer
    } else if pharmacy {
        Role::Pharmacy
    } else if doctor {
        Role::Doctor
    } else {
        Role::Patient
    };

    debug!(address = %address, role = %role.as_str(), "role resolved");
    Ok(role)
}
