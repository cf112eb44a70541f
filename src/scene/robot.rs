//! The robot scene: one animated robot over a ground plate in a dust cloud.

use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use super::{
    figure::{build_figure, Figure, FigureRole},
    graph::{NodeId, SceneGraph, Transform},
    props,
};

#[derive(Debug)]
pub struct RobotScene {
    pub root: NodeId,
    pub robot: Figure,
    pub dust_anchor: NodeId,
    pub dust: usize,
}

pub fn build_robot(graph: &mut SceneGraph, seed: u64) -> RobotScene {
    let mut rng = StdRng::seed_from_u64(seed);
    let root = graph.add_group(None, Transform::IDENTITY);

    props::robot_ground(graph, root);
    let robot = build_figure(graph, &FigureRole::Robot.spec(), Some(root));
    let (dust_anchor, dust) = props::dust(graph, root, &mut rng);

    debug!("Built robot scene: {} nodes", graph.len());

    RobotScene {
        root,
        robot,
        dust_anchor,
        dust,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_one_robot_with_dust() {
        let mut graph = SceneGraph::new();
        let scene = build_robot(&mut graph, 3);
        assert!(scene.robot.is_robot());
        assert_eq!(graph.particles()[scene.dust].len(), 1000);
        assert!(graph.is_descendant_of(scene.robot.root, scene.root));
    }
}
