mod collision_properties;
mod collision_scenarios;
mod frame_equivalence;
mod polytope_construction;
mod random_shapes;
mod stp_margins;
