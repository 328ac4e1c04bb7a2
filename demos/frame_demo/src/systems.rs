//! Demo systems.

use ecs_runtime::{ComponentType, System, World};
use tracing::info;

use crate::components::{Model, Position, Velocity};
use crate::frame_loop::FrameTime;

/// Integrates `Velocity` into `Position`.
pub struct Drift;

impl System<FrameTime> for Drift {
    fn update(&mut self, world: &mut World, time: &FrameTime) -> anyhow::Result<()> {
        let types = [ComponentType::of::<Position>(), ComponentType::of::<Velocity>()];
        for entity in world.query_entities_with(&types) {
            let Some(Velocity(v)) = world.get::<Velocity>(entity)?.copied() else {
                continue;
            };
            if let Some(Position(p)) = world.get_mut::<Position>(entity)? {
                *p += v * time.dt as f32;
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "drift"
    }
}

/// Moves every model's scene node to its entity's `Position`.
pub struct SyncModels;

impl System<FrameTime> for SyncModels {
    fn update(&mut self, world: &mut World, _time: &FrameTime) -> anyhow::Result<()> {
        let types = [ComponentType::of::<Model>(), ComponentType::of::<Position>()];
        for entity in world.query_entities_with(&types) {
            let (Some(model), Some(pos)) = (world.get::<Model>(entity)?, world.get::<Position>(entity)?)
            else {
                continue;
            };
            model.set_pos(pos.0);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "sync_models"
    }
}

/// Logs every positioned entity once every `every` frames.
pub struct Report {
    pub every: u64,
}

impl System<FrameTime> for Report {
    fn update(&mut self, world: &mut World, time: &FrameTime) -> anyhow::Result<()> {
        if self.every == 0 || time.frame % self.every != 0 {
            return Ok(());
        }
        for entity in world.query_entities_with(&[ComponentType::of::<Position>()]) {
            if let Some(Position(p)) = world.get::<Position>(entity)? {
                info!(
                    frame = time.frame,
                    entity = entity.id(),
                    x = p.x,
                    y = p.y,
                    z = p.z,
                    "position"
                );
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "report"
    }
}

#[cfg(test)]
mod tests {
    use ecs_runtime::{EntityManager, components, handle};
    use glam::Vec3;

    use super::*;
    use crate::components::Scene;

    #[test]
    fn test_drift_then_sync_moves_model() {
        let scene = Scene::shared();
        let mut ecs: EntityManager<FrameTime> = EntityManager::new();
        let e = ecs.create_entity(components![
            Model::load("box", &scene),
            Position::new(0.0, 20.0, 0.0),
            Velocity(Vec3::new(2.0, 0.0, 0.0))
        ]);
        ecs.add_system(handle(SyncModels), 10).unwrap();
        ecs.add_system(handle(Drift), 0).unwrap();

        ecs.do_frame(&FrameTime { frame: 1, dt: 0.5 }).unwrap();

        assert_eq!(ecs.get::<Position>(e).unwrap(), Some(&Position::new(1.0, 20.0, 0.0)));
        assert_eq!(scene.borrow().translation("box"), Some(Vec3::new(1.0, 20.0, 0.0)));
    }

    #[test]
    fn test_entity_without_velocity_stays_put() {
        let mut ecs: EntityManager<FrameTime> = EntityManager::new();
        let e = ecs.create_entity(components![Position::new(1.0, 1.0, 1.0)]);
        ecs.add_system(handle(Drift), 0).unwrap();
        ecs.do_frame(&FrameTime { frame: 1, dt: 1.0 }).unwrap();
        assert_eq!(ecs.get::<Position>(e).unwrap(), Some(&Position::new(1.0, 1.0, 1.0)));
    }
}
