use clap::{Args, ValueEnum};
use proposal_ranking::error::AppError;
use proposal_ranking::import::ProposalCsvImporter;
use proposal_ranking::ranking::{
    rank_proposals, DeliveryType, GraficaId, OrderId, PrintTechnology, Proposal, ProposalId,
    RankingOutcome, SortKey, VendorTier,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum SortArg {
    #[default]
    Score,
    Price,
    Distance,
    Rating,
    Production,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Score => SortKey::Score,
            SortArg::Price => SortKey::Price,
            SortArg::Distance => SortKey::Distance,
            SortArg::Rating => SortKey::Rating,
            SortArg::Production => SortKey::ProductionTime,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// CSV export with one proposal per row (camelCase headers)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Ordering of the printed comparison
    #[arg(long, value_enum, default_value_t = SortArg::Score)]
    pub(crate) sort: SortArg,
    /// Print the full ranking outcome as JSON instead of a readable table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Ordering of the printed comparison
    #[arg(long, value_enum, default_value_t = SortArg::Score)]
    pub(crate) sort: SortArg,
    /// Print the full ranking outcome as JSON instead of a readable table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let proposals = ProposalCsvImporter::from_path(&args.csv)?;
    let outcome = rank_proposals(&proposals)?;
    print_outcome(&outcome, args.sort, args.json)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Proposal ranking demo: banner order pedido-demo-01\n");
    let outcome = rank_proposals(&sample_proposals())?;
    print_outcome(&outcome, args.sort, args.json)
}

fn print_outcome(outcome: &RankingOutcome, sort: SortArg, json: bool) -> Result<(), AppError> {
    if json {
        let rendered = serde_json::to_string_pretty(outcome)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        for line in render_outcome(outcome, sort.into()) {
            println!("{line}");
        }
    }
    Ok(())
}

pub(crate) fn render_outcome(outcome: &RankingOutcome, sort: SortKey) -> Vec<String> {
    let context = &outcome.context;
    let mut lines = Vec::new();

    let mut averages = format!("Average price: {:.2}", context.preco_medio);
    if let Some(per_area) = context.preco_medio_por_m2 {
        averages.push_str(&format!(" ({per_area:.2} per m2)"));
    }
    lines.push(averages);
    lines.push(format!("Closest shop: {:.1} km", context.menor_distancia));

    lines.push(String::new());
    lines.push("Proposals".to_string());
    for entry in outcome.sorted_by(sort) {
        let proposal = &entry.proposal;
        let badges: Vec<&str> = entry.badges.iter().map(|badge| badge.label()).collect();
        let mut line = format!(
            "- {} ({}): score {:.3}, price {:.2} ({:+.1}%, {}), rating {:.1}, {:.1} km, {:.0} h, {}",
            proposal.id,
            proposal.grafica_id.0,
            entry.score,
            proposal.preco_total,
            entry.preco_percentual_vs_media,
            entry.preco_status.label(),
            proposal.nota_geral,
            proposal.distancia_km,
            proposal.tempo_medio_producao_horas,
            proposal.delivery_type.label(),
        );
        if context.is_closest(proposal) {
            line.push_str(", closest");
        }
        if !badges.is_empty() {
            line.push_str(&format!(" [{}]", badges.join(", ")));
        }
        lines.push(line);
    }

    let warnings = outcome.warnings();
    if warnings.is_empty() {
        lines.push("\nExcluded proposals: none".to_string());
    } else {
        lines.push("\nExcluded proposals".to_string());
        lines.extend(warnings.into_iter().map(|warning| format!("- {warning}")));
    }

    lines
}

fn sample_proposal(
    id: &str,
    grafica: &str,
    preco_total: f64,
    nota_geral: f64,
    distancia_km: f64,
    producao_horas: f64,
) -> Proposal {
    Proposal {
        id: ProposalId(id.to_string()),
        pedido_id: OrderId("pedido-demo-01".to_string()),
        grafica_id: GraficaId(grafica.to_string()),
        preco_total,
        preco_por_m2: Some(preco_total / 6.0),
        delivery_type: DeliveryType::EntregaPaga,
        aceita_cupom: false,
        nota_geral,
        nota_prazo: None,
        nota_qualidade: None,
        nota_atendimento: None,
        nivel: VendorTier::Prata,
        distancia_km,
        tempo_medio_producao_horas: producao_horas,
        historico_na_categoria: 4,
        tempo_resposta_minutos: 30.0,
        tecnologia: PrintTechnology::GrandeFormato,
    }
}

/// A six square metre banner quoted by four shops.
pub(crate) fn sample_proposals() -> Vec<Proposal> {
    vec![
        Proposal {
            delivery_type: DeliveryType::EntregaGratis,
            nivel: VendorTier::Ouro,
            historico_na_categoria: 31,
            tempo_resposta_minutos: 9.0,
            ..sample_proposal("demo-1", "grafica-centro", 540.0, 4.8, 3.2, 48.0)
        },
        Proposal {
            aceita_cupom: true,
            delivery_type: DeliveryType::Retirada,
            ..sample_proposal("demo-2", "grafica-bairro", 410.0, 4.3, 9.5, 72.0)
        },
        Proposal {
            historico_na_categoria: 12,
            tempo_resposta_minutos: 14.0,
            ..sample_proposal("demo-3", "print-express", 620.0, 4.6, 14.0, 24.0)
        },
        Proposal {
            nivel: VendorTier::Bronze,
            historico_na_categoria: 1,
            tempo_resposta_minutos: 240.0,
            tecnologia: PrintTechnology::Digital,
            ..sample_proposal("demo-4", "atelie-novo", 365.0, 3.8, 22.0, 96.0)
        },
    ]
}
