//! Fuel tank gauge: a box of fuel whose height follows the quantity.

use glam::Vec3;

use crate::error::FlowError;
use crate::geometry::MeshData;
use crate::options::TankOptions;
use crate::scene::{LiquidMesh, Material, MeshHandle, Scene, EMPTY_FILL};

/// Component name of the tank casing.
pub const TANK: &str = "Fuel_Tank";

/// Fuel quantity control bound to the tank's fuel mesh.
#[derive(Debug, Clone)]
pub struct FuelTank {
    gauge: MeshHandle,
    quantity: u8,
    options: TankOptions,
}

impl FuelTank {
    /// Add the fuel mesh inside the tank and apply the initial quantity.
    pub fn install(
        scene: &mut Scene,
        options: &TankOptions,
        color: [f32; 3],
    ) -> Result<Self, FlowError> {
        let Some(tank) = scene.component(TANK) else {
            log::warn!("{TANK} not found, fuel gauge unavailable");
            return Err(FlowError::MissingObject(TANK.to_owned()));
        };
        let bounds = tank.bounding_box();
        let size = bounds.size() * Vec3::from(options.fill_fraction);
        let center = bounds.center();

        // Anchored at the tank floor so the level rises upward.
        let mut geometry = MeshData::cuboid(size);
        geometry.translate(Vec3::Y * (size.y * 0.5));
        let mut mesh = LiquidMesh::new(
            "Fuel_Tank/fuel",
            geometry,
            Material::liquid(color),
            Vec3::new(center.x, bounds.min.y, center.z),
            Vec3::ONE,
        );
        mesh.visible = true;
        let gauge = scene.add_mesh(mesh);

        let mut tank = Self {
            gauge,
            quantity: 0,
            options: options.clone(),
        };
        let _ = tank.set_quantity(scene, options.initial_quantity);
        Ok(tank)
    }

    /// Set the quantity in percent (clamped to 100) and return the new fill
    /// level.
    pub fn set_quantity(&mut self, scene: &mut Scene, quantity: u8) -> f32 {
        self.quantity = quantity.min(100);
        let level = (f32::from(self.quantity) / 100.0).max(EMPTY_FILL);
        if let Some(mesh) = scene.mesh_mut(self.gauge) {
            mesh.set_fill_level(level);
        }

        if let Some(casing) = scene.component_mut(TANK) {
            if self.quantity >= self.options.transparent_threshold {
                casing.set_translucent(self.options.casing_opacity);
            } else {
                casing.set_opaque();
            }
        }
        log::debug!("Fuel quantity {}% (level {level:.2})", self.quantity);
        level
    }

    /// Quantity in percent.
    #[must_use]
    pub fn quantity(&self) -> u8 {
        self.quantity
    }

    /// Whether any fuel is loaded.
    #[must_use]
    pub fn has_fuel(&self) -> bool {
        self.quantity > 0
    }

    /// Handle of the fuel mesh, read by the liquid sequencer as its start
    /// gate.
    #[must_use]
    pub fn gauge(&self) -> MeshHandle {
        self.gauge
    }
}
