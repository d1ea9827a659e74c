//! Behavioral guarantees of the ranking engine exercised through the public API.
//!
//! Proposal sets are generated from a fixed seed so failures are reproducible.

use proposal_ranking::ranking::{
    rank_proposals, Badge, DeliveryType, GraficaId, OrderId, PrecoStatus, PrintTechnology,
    Proposal, ProposalId, RankingError, SortKey, VendorTier,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

struct SeededSets {
    rng: StdRng,
}

impl SeededSets {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn proposal_set(&mut self, size: usize) -> Vec<Proposal> {
        let mut proposals: Vec<Proposal> = Vec::with_capacity(size);
        for index in 0..size {
            let id = ProposalId(format!("prop-{:03}", (index * 37) % 101));
            // Roughly one in four proposals repeats an earlier offer under a new id.
            if index > 0 && self.rng.gen_bool(0.25) {
                let twin = self.rng.gen_range(0..proposals.len());
                let copy = Proposal {
                    id,
                    grafica_id: GraficaId(format!("grafica-{index}")),
                    ..proposals[twin].clone()
                };
                proposals.push(copy);
                continue;
            }

            proposals.push(Proposal {
                id,
                pedido_id: OrderId("pedido-77".to_string()),
                grafica_id: GraficaId(format!("grafica-{index}")),
                preco_total: 50.0 * f64::from(self.rng.gen_range(1u32..=18)),
                preco_por_m2: None,
                delivery_type: DeliveryType::Retirada,
                aceita_cupom: index % 2 == 0,
                nota_geral: f64::from(self.rng.gen_range(0u32..=10)) / 2.0,
                nota_prazo: None,
                nota_qualidade: None,
                nota_atendimento: None,
                nivel: VendorTier::Bronze,
                distancia_km: f64::from(self.rng.gen_range(0u32..=400)) / 10.0,
                tempo_medio_producao_horas: 4.0 * f64::from(self.rng.gen_range(1u32..=20)),
                historico_na_categoria: self.rng.gen_range(0..25),
                tempo_resposta_minutos: f64::from(self.rng.gen_range(0u32..=240)),
                tecnologia: PrintTechnology::Offset,
            });
        }
        proposals
    }

    fn shuffled(&mut self, proposals: &[Proposal]) -> Vec<Proposal> {
        let mut shuffled = proposals.to_vec();
        shuffled.shuffle(&mut self.rng);
        shuffled
    }
}

fn proposal(id: &str, preco_total: f64) -> Proposal {
    Proposal {
        id: ProposalId(id.to_string()),
        pedido_id: OrderId("pedido-1".to_string()),
        grafica_id: GraficaId(format!("grafica-{id}")),
        preco_total,
        preco_por_m2: None,
        delivery_type: DeliveryType::EntregaGratis,
        aceita_cupom: true,
        nota_geral: 4.5,
        nota_prazo: Some(4.0),
        nota_qualidade: Some(5.0),
        nota_atendimento: Some(4.5),
        nivel: VendorTier::Ouro,
        distancia_km: 7.5,
        tempo_medio_producao_horas: 36.0,
        historico_na_categoria: 8,
        tempo_resposta_minutos: 25.0,
        tecnologia: PrintTechnology::Digital,
    }
}

#[test]
fn every_category_has_exactly_one_winner_and_true_minimum_distance() {
    let mut sets = SeededSets::new(4821);
    for size in 1..=12 {
        let proposals = sets.proposal_set(size);
        let outcome = rank_proposals(&proposals).expect("valid set ranks");

        for badge in Badge::ALL {
            let holders = outcome
                .scored
                .iter()
                .filter(|entry| entry.has_badge(badge))
                .count();
            assert_eq!(holders, 1, "badge {badge:?} in set of {size}");
            assert_eq!(
                outcome.badge_holder(badge).map(|entry| entry.id()),
                Some(outcome.context.winner(badge))
            );
        }

        let true_min = proposals
            .iter()
            .map(|p| p.distancia_km)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(outcome.context.menor_distancia, true_min);
    }
}

#[test]
fn mean_price_matches_arithmetic_mean() {
    let mut sets = SeededSets::new(99);
    for size in [1, 2, 5, 17, 40] {
        let proposals = sets.proposal_set(size);
        let outcome = rank_proposals(&proposals).expect("valid set ranks");
        let mean = proposals.iter().map(|p| p.preco_total).sum::<f64>() / size as f64;
        assert!((outcome.context.preco_medio - mean).abs() < 1e-6);
    }
}

#[test]
fn scores_stay_in_unit_range() {
    let mut sets = SeededSets::new(7);
    let proposals = sets.proposal_set(30);
    let outcome = rank_proposals(&proposals).expect("valid set ranks");
    assert!(outcome
        .scored
        .iter()
        .all(|entry| (0.0..=1.0).contains(&entry.score)));
}

#[test]
fn shuffled_input_yields_same_context_and_winners() {
    let mut sets = SeededSets::new(2024);
    for size in [2, 6, 15, 40] {
        let proposals = sets.proposal_set(size);
        let baseline = rank_proposals(&proposals).expect("valid set ranks");
        let baseline_order: Vec<&ProposalId> = baseline
            .sorted_by(SortKey::Score)
            .into_iter()
            .map(|entry| entry.id())
            .collect();

        for _ in 0..8 {
            let shuffled = sets.shuffled(&proposals);
            let outcome = rank_proposals(&shuffled).expect("valid set ranks");

            assert_eq!(outcome.context, baseline.context, "set of {size}");
            for entry in &baseline.scored {
                assert_eq!(Some(entry), outcome.find(entry.id()));
            }
            let order: Vec<&ProposalId> = outcome
                .sorted_by(SortKey::Score)
                .into_iter()
                .map(|entry| entry.id())
                .collect();
            assert_eq!(order, baseline_order);
        }
    }
}

#[test]
fn tied_offers_go_to_the_smaller_id_wherever_they_sit() {
    let mut sets = SeededSets::new(31);
    let mut proposals = sets.proposal_set(9);
    let best = Proposal {
        preco_total: 40.0,
        nota_geral: 5.0,
        distancia_km: 0.0,
        tempo_medio_producao_horas: 1.0,
        tempo_resposta_minutos: 0.0,
        historico_na_categoria: 30,
        ..proposals[0].clone()
    };
    proposals.push(Proposal {
        id: ProposalId("tie-b".to_string()),
        ..best.clone()
    });
    proposals.push(Proposal {
        id: ProposalId("tie-a".to_string()),
        ..best
    });

    for _ in 0..10 {
        let shuffled = sets.shuffled(&proposals);
        let outcome = rank_proposals(&shuffled).expect("valid set ranks");
        for badge in Badge::ALL {
            assert_eq!(outcome.context.winner(badge).0, "tie-a", "badge {badge:?}");
        }
    }
}

#[test]
fn price_scenario_classifies_around_the_mean() {
    let proposals = vec![
        proposal("p-100", 100.0),
        proposal("p-150", 150.0),
        proposal("p-200", 200.0),
    ];

    let outcome = rank_proposals(&proposals).expect("valid set ranks");

    assert_eq!(outcome.context.preco_medio, 150.0);
    let low = &outcome.scored[0];
    let mid = &outcome.scored[1];
    let high = &outcome.scored[2];
    assert_eq!(low.preco_status, PrecoStatus::AbaixoMedia);
    assert!((low.preco_percentual_vs_media + 33.333_333).abs() < 1e-3);
    assert_eq!(mid.preco_status, PrecoStatus::NaMedia);
    assert_eq!(mid.preco_percentual_vs_media, 0.0);
    assert_eq!(high.preco_status, PrecoStatus::AcimaMedia);
    assert!((high.preco_percentual_vs_media - 33.333_333).abs() < 1e-3);
}

#[test]
fn identical_offers_resolve_to_the_smaller_id_in_any_order() {
    let forward = vec![proposal("grafica-b", 120.0), proposal("grafica-a", 120.0)];
    let backward = vec![proposal("grafica-a", 120.0), proposal("grafica-b", 120.0)];

    for _ in 0..3 {
        for set in [&forward, &backward] {
            let outcome = rank_proposals(set).expect("valid set ranks");
            assert_eq!(outcome.context.recomendada_id.0, "grafica-a");
        }
    }
}

#[test]
fn a_negative_distance_does_not_leak_into_group_statistics() {
    let clean = vec![
        proposal("p-1", 100.0),
        Proposal {
            distancia_km: 1.5,
            ..proposal("p-2", 140.0)
        },
        proposal("p-3", 180.0),
    ];
    let mut dirty = clean.clone();
    dirty.push(Proposal {
        distancia_km: -5.0,
        nota_geral: 5.0,
        tempo_medio_producao_horas: 1.0,
        ..proposal("p-4", 20.0)
    });

    let baseline = rank_proposals(&clean).expect("valid set ranks");
    let outcome = rank_proposals(&dirty).expect("remaining proposals rank");

    assert_eq!(outcome.context, baseline.context);
    assert!(outcome.find(&ProposalId("p-4".to_string())).is_none());
    assert_eq!(outcome.flagged.len(), 1);
    assert_eq!(outcome.warnings().len(), 1);
}

#[test]
fn empty_set_is_a_typed_error() {
    let error = rank_proposals(&[]).expect_err("empty set rejected");
    assert_eq!(error, RankingError::EmptyProposalSet);
    assert_eq!(error.to_string(), "no proposals to compare");
}
