//! # Role Controllers
//!
//! One controller per resolved role. Each is a thin facade over the shared
//! [`ContractClient`](oath_contract::ContractClient): no chain state is
//! cached, and writes are never pipelined.

pub mod doctor;
pub mod manufacturer;
pub mod patient;
pub mod pharmacy;

pub use doctor::DoctorPortal;
pub use manufacturer::ManufacturerPortal;
pub use patient::PatientPortal;
pub use pharmacy::PharmacyPortal;

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared controller-test scaffolding: a bound client over a seeded
    //! in-memory ledger.

    use oath_contract::{ContractClient, InMemoryLedger};
    use oath_types::Address;
    use std::sync::Arc;

    pub fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    /// Admin is `addr(1)`; manufacturer `addr(2)`, doctor `addr(3)`,
    /// pharmacy `addr(4)`. Patients are any other address.
    pub async fn seeded_ledger() -> Arc<InMemoryLedger> {
        let ledger = Arc::new(InMemoryLedger::new(addr(1)));
        let admin = client_as(&ledger, addr(1)).await;
        admin.enroll_manufacturer(addr(2)).await.unwrap();
        admin.enroll_doctor(addr(3)).await.unwrap();
        admin.enroll_pharmacy(addr(4)).await.unwrap();
        ledger
    }

    /// A read-write client bound over `ledger` with `signer`.
    pub async fn client_as(ledger: &Arc<InMemoryLedger>, signer: Address) -> Arc<ContractClient> {
        let client = ContractClient::new();
        client.bind_read_only(Arc::clone(ledger) as _).await;
        client.bind_signer(signer).await.unwrap();
        Arc::new(client)
    }
}
