//! Headless entity view demo
//!
//! Spawns a handful of asteroids and a ship into a scene group, moves them
//! around for a few ticks, prints the draw order, then deactivates
//! everything and checks the scene emptied itself.
//!
//! Usage: `view_demo [config.toml|config.ron]`

use entity_view::prelude::*;
use rand::Rng;
use std::rc::Rc;
use thiserror::Error;

const NUM_ASTEROIDS: usize = 5;
const NUM_TICKS: usize = 3;

const BACKDROP: RenderLayer = RenderLayer::BACKGROUND;
const ROCKS: RenderLayer = RenderLayer::new("ROCKS", 10);
const SHIPS: RenderLayer = RenderLayer::new("SHIPS", 20);

#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("View error: {0}")]
    View(#[from] ViewError),

    #[error("Scene still holds {0} view(s) after deactivation")]
    Leftover(usize),
}

struct Spawned {
    entity: Rc<Entity>,
    view: View,
}

struct ViewDemo {
    world: Rc<Group>,
    spawned: Vec<Spawned>,
}

impl ViewDemo {
    fn new() -> Self {
        Self {
            world: Group::new("world"),
            spawned: Vec::new(),
        }
    }

    fn spawn(
        &mut self,
        entity: Entity,
        graphic: NodeHandle,
        layer: RenderLayer,
    ) -> Result<(), DemoError> {
        let entity = Rc::new(entity);
        let view = View::with_graphic(entity.clone(), graphic);
        view.set_render_layer(layer)?;
        self.world.add_view(&view)?;
        entity.set_active(true);

        log::info!(
            "Spawned {} at ({:.1}, {:.1}) on {}",
            entity.type_name(),
            entity.x(),
            entity.y(),
            layer
        );
        self.spawned.push(Spawned { entity, view });
        Ok(())
    }

    fn initialize(&mut self) -> Result<(), DemoError> {
        let mut rng = rand::thread_rng();

        let backdrop = Entity::new("backdrop");
        backdrop.set_size(800.0, 600.0);
        self.spawn(backdrop, NodeHandle::sprite("stars", 800.0, 600.0), BACKDROP)?;

        for _ in 0..NUM_ASTEROIDS {
            let radius = rng.gen_range(8.0..32.0);
            let asteroid = Entity::new("asteroid");
            asteroid.set_position(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
            asteroid.add_hit_box(HitBox::new("core", 0.0, 0.0, radius * 2.0, radius * 2.0));
            let graphic = NodeHandle::circle(radius).with_fill(Some(Color::rgb(0.5, 0.45, 0.4)));
            self.spawn(asteroid, graphic, ROCKS)?;
        }

        let ship = Entity::new("ship");
        ship.set_position(400.0, 300.0);
        ship.set_x_flip_line(20.0);
        ship.add_hit_box(HitBox::new("hull", 0.0, 0.0, 40.0, 20.0));
        self.spawn(ship, NodeHandle::sprite("ship", 40.0, 20.0), SHIPS)?;

        Ok(())
    }

    fn tick(&self, tick: usize) {
        let mut rng = rand::thread_rng();
        for Spawned { entity, .. } in &self.spawned {
            match entity.type_name() {
                "asteroid" => {
                    entity.translate(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
                    entity.rotate_by(rng.gen_range(-15.0..15.0));
                }
                "ship" => {
                    entity.translate(10.0, 0.0);
                    entity.set_x_flipped(tick % 2 == 1);
                }
                _ => {}
            }
        }
    }

    fn report(&self) {
        for (layer, views) in self.world.layers() {
            log::info!("Layer {} - {} view(s)", layer, views.len());
            for view in views {
                let t = view.translate();
                log::info!(
                    "  at ({:.1}, {:.1}) rot {:.1} children {} transforms {}",
                    t.x,
                    t.y,
                    view.rotation(),
                    view.child_count(),
                    view.transforms().len()
                );
            }
        }
    }

    fn shutdown(&mut self) -> Result<(), DemoError> {
        for Spawned { entity, view } in self.spawned.drain(..) {
            entity.set_active(false);
            log::debug!("{} view is now {:?}", entity.type_name(), view.state());
        }

        match self.world.len() {
            0 => Ok(()),
            leftover => Err(DemoError::Leftover(leftover)),
        }
    }
}

fn run() -> Result<(), DemoError> {
    if let Some(path) = std::env::args().nth(1) {
        let config = ViewConfig::load_from_file(&path)?;
        log::info!("Loaded view config from {}", path);
        config.apply_globally();
    }

    let mut demo = ViewDemo::new();
    demo.initialize()?;

    for tick in 0..NUM_TICKS {
        demo.tick(tick);
        log::info!("Tick {}", tick);
        demo.report();
    }

    demo.shutdown()?;
    log::info!("All views detached, scene is empty");
    Ok(())
}

fn main() {
    entity_view::foundation::logging::init();

    log::info!("Starting entity view demo");
    if let Err(e) = run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}
