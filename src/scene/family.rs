//! The family scene: figures chosen by the flags, standing in a small landscape.

use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use super::{
    figure::{build_figure, Figure, FigureRole, SPAWN_HEIGHT},
    flags::SceneFlags,
    graph::{NodeId, SceneGraph, Transform},
    props::{self, Car, Cloud},
};
use crate::animation::{easing::Easing, tween::Tween};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyOptions {
    pub rain_drops: usize,
    pub grass_blades: usize,
    pub flowers: usize,
}

impl Default for FamilyOptions {
    fn default() -> Self {
        Self {
            rain_drops: 15_000,
            grass_blades: 2_000,
            flowers: 50,
        }
    }
}

#[derive(Debug)]
pub struct FamilyScene {
    pub root: NodeId,
    pub figures: Vec<Figure>,
    /// Drop-in height over time, one per figure
    pub landings: Vec<Tween>,
    pub clouds: Vec<Cloud>,
    pub cars: Vec<Car>,
    pub sky: NodeId,
    pub rain: usize,
    pub fireflies: usize,
}

/// Roles present for `flags`, in build order
pub fn roles_for(flags: &SceneFlags) -> Vec<FigureRole> {
    let mut roles = Vec::with_capacity(4);
    if flags.has_wife {
        roles.push(FigureRole::Mother);
    }
    roles.push(FigureRole::Father);
    if flags.has_son {
        roles.push(FigureRole::Son);
    }
    if flags.has_daughter {
        roles.push(FigureRole::Daughter);
    }
    roles
}

pub fn build_family(
    graph: &mut SceneGraph,
    flags: &SceneFlags,
    seed: u64,
    options: &FamilyOptions,
) -> FamilyScene {
    let mut rng = StdRng::seed_from_u64(seed);
    let root = graph.add_group(None, Transform::IDENTITY);

    let sky = props::sky(graph, root);
    props::ground(graph, root, &mut rng);
    props::grass(graph, root, &mut rng, options.grass_blades);
    props::house(graph, root);
    props::trees(graph, root);
    let clouds = props::clouds(graph, root, &mut rng);
    props::mountains(graph, root);
    props::flowers(graph, root, &mut rng, options.flowers);
    props::road(graph, root);
    let cars = props::cars(graph, root, &mut rng);
    props::fence(graph, root);
    let fireflies = props::fireflies(graph, root, &mut rng);
    let rain = props::rain(graph, root, &mut rng, options.rain_drops);

    let mut figures = Vec::new();
    let mut landings = Vec::new();
    for (index, role) in roles_for(flags).into_iter().enumerate() {
        let figure = build_figure(graph, &role.spec(), Some(root));
        landings.push(
            Tween::new(figure.home.y + SPAWN_HEIGHT, figure.home.y, 1.0)
                .with_delay(index as f32 * 0.5)
                .with_easing(Easing::BounceOut),
        );
        figures.push(figure);
    }

    debug!(
        "Built family scene: {} figures, {} nodes, {} meshes",
        figures.len(),
        graph.len(),
        graph.meshes().len()
    );

    FamilyScene {
        root,
        figures,
        landings,
        clouds,
        cars,
        sky,
        rain,
        fireflies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn small() -> FamilyOptions {
        FamilyOptions {
            rain_drops: 100,
            grass_blades: 20,
            flowers: 5,
        }
    }

    fn all_flag_combinations() -> impl Iterator<Item = SceneFlags> {
        (0..8u8).map(|bits| SceneFlags {
            has_wife: bits & 1 != 0,
            has_son: bits & 2 != 0,
            has_daughter: bits & 4 != 0,
            ..Default::default()
        })
    }

    #[test]
    fn figure_count_matches_flags() {
        for flags in all_flag_combinations() {
            let mut graph = SceneGraph::new();
            let scene = build_family(&mut graph, &flags, 1, &small());
            assert_eq!(scene.figures.len(), flags.family_size(), "{flags:?}");
            assert_eq!(scene.landings.len(), scene.figures.len());
        }
    }

    #[test]
    fn no_flags_builds_only_the_father() {
        let mut graph = SceneGraph::new();
        let scene = build_family(&mut graph, &SceneFlags::default(), 1, &small());
        assert_eq!(scene.figures.len(), 1);
        assert_eq!(scene.figures[0].role, FigureRole::Father);
    }

    #[test]
    fn full_family_has_distinct_offsets() {
        let flags = SceneFlags {
            has_son: true,
            has_daughter: true,
            has_wife: true,
            ..Default::default()
        };
        let mut graph = SceneGraph::new();
        let scene = build_family(&mut graph, &flags, 1, &small());
        assert_eq!(scene.figures.len(), 4);
        let homes: Vec<Vector3<f32>> = scene.figures.iter().map(|f| f.home).collect();
        for (i, a) in homes.iter().enumerate() {
            for b in &homes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn placement_is_deterministic() {
        let flags = SceneFlags {
            has_son: true,
            ..Default::default()
        };
        let positions = |seed| {
            let mut graph = SceneGraph::new();
            let scene = build_family(&mut graph, &flags, seed, &small());
            scene
                .figures
                .iter()
                .map(|f| graph.transform(f.root).position)
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(1), positions(1));
        // Figures sit at fixed homes regardless of the decoration seed
        assert_eq!(positions(1), positions(99));
    }

    #[test]
    fn later_figures_land_later() {
        let flags = SceneFlags {
            has_wife: true,
            has_son: true,
            ..Default::default()
        };
        let mut graph = SceneGraph::new();
        let scene = build_family(&mut graph, &flags, 1, &small());
        let delays: Vec<f32> = scene.landings.iter().map(|t| t.delay).collect();
        assert_eq!(delays, vec![0.0, 0.5, 1.0]);
    }
}
