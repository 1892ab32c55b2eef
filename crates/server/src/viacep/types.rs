//! `ViaCEP` response types.

use serde::Deserialize;

use customer_registry_core::{Address, PostalCode};

/// A resolved address as `ViaCEP` spells it (body of `GET /ws/{cep}/json/`).
#[derive(Debug, Clone, Deserialize)]
pub struct ViaCepAddress {
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub unidade: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default)]
    pub ibge: String,
    #[serde(default)]
    pub gia: String,
    #[serde(default)]
    pub ddd: String,
    #[serde(default)]
    pub siafi: String,
}

impl ViaCepAddress {
    /// Convert into the registry's address, keyed by the CEP `ViaCEP` echoed.
    pub(super) fn into_address(self, postal_code: PostalCode) -> Address {
        Address {
            postal_code,
            street: self.logradouro,
            complement: self.complemento,
            unit: self.unidade,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
            ibge_code: self.ibge,
            gia_code: self.gia,
            area_code: self.ddd,
            tax_system_code: self.siafi,
        }
    }
}
