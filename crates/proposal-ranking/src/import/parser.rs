use crate::ranking::domain::{
    normalize_token, DeliveryType, GraficaId, OrderId, PrintTechnology, Proposal, ProposalId,
    VendorTier,
};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::str::FromStr;

use super::ProposalImportError;

pub(crate) fn parse_proposals<R: Read>(reader: R) -> Result<Vec<Proposal>, ProposalImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut proposals = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: ProposalRow = record.deserialize(Some(&headers))?;
        proposals.push(row.into_proposal(line)?);
    }

    Ok(proposals)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProposalRow {
    id: String,
    pedido_id: String,
    grafica_id: String,
    preco_total: f64,
    #[serde(default)]
    preco_por_m2: Option<f64>,
    delivery_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    aceita_cupom: Option<String>,
    nota_geral: f64,
    #[serde(default)]
    nota_prazo: Option<f64>,
    #[serde(default)]
    nota_qualidade: Option<f64>,
    #[serde(default)]
    nota_atendimento: Option<f64>,
    nivel: String,
    distancia_km: f64,
    tempo_medio_producao_horas: f64,
    historico_na_categoria: u32,
    tempo_resposta_minutos: f64,
    tecnologia: String,
}

impl ProposalRow {
    fn into_proposal(self, line: u64) -> Result<Proposal, ProposalImportError> {
        let delivery_type = parse_field::<DeliveryType>(line, "deliveryType", &self.delivery_type)?;
        let nivel = parse_field::<VendorTier>(line, "nivel", &self.nivel)?;
        let tecnologia = parse_field::<PrintTechnology>(line, "tecnologia", &self.tecnologia)?;
        let aceita_cupom = match self.aceita_cupom.as_deref() {
            None => false,
            Some(raw) => parse_flag(raw).ok_or_else(|| ProposalImportError::InvalidField {
                line,
                field: "aceitaCupom",
                value: raw.to_string(),
            })?,
        };

        Ok(Proposal {
            id: ProposalId(self.id),
            pedido_id: OrderId(self.pedido_id),
            grafica_id: GraficaId(self.grafica_id),
            preco_total: self.preco_total,
            preco_por_m2: self.preco_por_m2,
            delivery_type,
            aceita_cupom,
            nota_geral: self.nota_geral,
            nota_prazo: self.nota_prazo,
            nota_qualidade: self.nota_qualidade,
            nota_atendimento: self.nota_atendimento,
            nivel,
            distancia_km: self.distancia_km,
            tempo_medio_producao_horas: self.tempo_medio_producao_horas,
            historico_na_categoria: self.historico_na_categoria,
            tempo_resposta_minutos: self.tempo_resposta_minutos,
            tecnologia,
        })
    }
}

fn parse_field<T: FromStr>(
    line: u64,
    field: &'static str,
    raw: &str,
) -> Result<T, ProposalImportError> {
    raw.parse::<T>()
        .map_err(|_| ProposalImportError::InvalidField {
            line,
            field,
            value: raw.to_string(),
        })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match normalize_token(raw).as_str() {
        "TRUE" | "SIM" | "S" | "YES" | "1" => Some(true),
        "FALSE" | "NAO" | "N" | "NO" | "0" => Some(false),
        _ => None,
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
pub(crate) fn parse_flag_for_tests(raw: &str) -> Option<bool> {
    parse_flag(raw)
}
