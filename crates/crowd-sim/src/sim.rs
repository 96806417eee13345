//! The `Simulator` façade and its step loop.

use crowd_core::{AgentDefaults, AgentId, AgentParams, Line, Vec2, VertexId};
use crowd_solve::{agent_line, avoiding_velocity, obstacle_line, Body};
use crowd_spatial::{AgentKdTree, ObstacleKdTree, ObstacleMap};

use crate::error::{SimError, SimResult};
use crate::observer::{NoopObserver, StepObserver};
use crate::store::{AgentScratch, AgentStore};

/// The simulation façade.
///
/// Owns all agents and obstacle vertices; external code holds plain ids.
/// Typical use: add obstacles, call [`process_obstacles`](Self::process_obstacles)
/// once, add agents, then per frame set preferred velocities and call
/// [`step`](Self::step).
///
/// Accessors index directly by id; passing an id that was never returned by
/// this simulator panics.
pub struct Simulator {
    pub(crate) agents: AgentStore,
    pub(crate) scratch: Vec<AgentScratch>,
    obstacles: ObstacleMap,
    agent_tree: AgentKdTree,
    obstacle_tree: ObstacleKdTree,
    defaults: Option<AgentDefaults>,
    time_step: f32,
    global_time: f32,
}

impl Simulator {
    // ── Construction ──────────────────────────────────────────────────────

    /// An empty simulator: time step 0, no default agent template.
    pub fn new() -> Self {
        Self {
            agents: AgentStore::default(),
            scratch: Vec::new(),
            obstacles: ObstacleMap::new(),
            agent_tree: AgentKdTree::new(),
            obstacle_tree: ObstacleKdTree::new(),
            defaults: None,
            time_step: 0.0,
            global_time: 0.0,
        }
    }

    /// An empty simulator with the time step set and a default agent
    /// template installed.
    pub fn with_defaults(time_step: f32, defaults: AgentDefaults) -> Self {
        let mut sim = Self::new();
        sim.time_step = time_step;
        sim.defaults = Some(defaults);
        sim
    }

    /// Install (or replace) the template used by [`add_agent`](Self::add_agent).
    pub fn set_agent_defaults(&mut self, defaults: AgentDefaults) {
        self.defaults = Some(defaults);
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Add an agent at `position` using the default template.
    ///
    /// Fails with [`SimError::NoAgentDefaults`] when no template is
    /// installed.
    pub fn add_agent(&mut self, position: Vec2) -> SimResult<AgentId> {
        let defaults = self.defaults.ok_or(SimError::NoAgentDefaults)?;
        Ok(self.add_agent_with(position, defaults.params, defaults.velocity))
    }

    /// Add an agent with explicit parameters and initial velocity.
    pub fn add_agent_with(
        &mut self,
        position: Vec2,
        params: AgentParams,
        velocity: Vec2,
    ) -> AgentId {
        self.scratch.push(AgentScratch::default());
        self.agents.push(position, velocity, params)
    }

    /// Add a polygonal obstacle given as vertices in CCW order; returns the
    /// id of the first vertex.
    ///
    /// The obstacle takes effect only after the next
    /// [`process_obstacles`](Self::process_obstacles).
    pub fn add_obstacle(&mut self, vertices: &[Vec2]) -> SimResult<VertexId> {
        Ok(self.obstacles.add_polygon(vertices)?)
    }

    /// Build (or rebuild) the obstacle tree over all obstacles added so far.
    pub fn process_obstacles(&mut self) {
        self.obstacle_tree.build(&mut self.obstacles);
    }

    // ── Per-step interface ────────────────────────────────────────────────

    /// Set the velocity `agent` would take if it had the world to itself.
    pub fn set_agent_pref_velocity(&mut self, agent: AgentId, pref_velocity: Vec2) {
        self.agents.pref_velocity[agent.index()] = pref_velocity;
    }

    /// Advance the simulation by one time step.
    pub fn step(&mut self) {
        self.step_observed(&mut NoopObserver);
    }

    /// Advance one time step, reporting progress through `observer`.
    pub fn step_observed<O: StepObserver>(&mut self, observer: &mut O) {
        observer.on_step_start(self.global_time);

        self.agent_tree.build(&self.agents.position);

        // ── Compute phase ─────────────────────────────────────────────────
        //
        // Each task reads the frozen store and writes only its own scratch
        // slot.  All agents must decide before any state advances.
        let agents = &self.agents;
        let obstacles = &self.obstacles;
        let agent_tree = &self.agent_tree;
        let obstacle_tree = &self.obstacle_tree;
        let time_step = self.time_step;

        #[cfg(not(feature = "parallel"))]
        self.scratch.iter_mut().enumerate().for_each(|(i, scratch)| {
            compute_agent(
                AgentId::from_index(i),
                agents,
                scratch,
                agent_tree,
                obstacle_tree,
                obstacles,
                time_step,
            );
        });

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.scratch
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, scratch)| {
                    compute_agent(
                        AgentId::from_index(i),
                        agents,
                        scratch,
                        agent_tree,
                        obstacle_tree,
                        obstacles,
                        time_step,
                    );
                });
        }

        for (i, scratch) in self.scratch.iter().enumerate() {
            if scratch.used_fallback {
                observer.on_fallback(AgentId::from_index(i));
            }
        }

        // ── Update phase ──────────────────────────────────────────────────
        #[cfg(not(feature = "parallel"))]
        self.agents
            .position
            .iter_mut()
            .zip(self.agents.velocity.iter_mut())
            .zip(self.scratch.iter())
            .for_each(|((position, velocity), scratch)| {
                *velocity = scratch.new_velocity;
                *position += *velocity * time_step;
            });

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.agents
                .position
                .par_iter_mut()
                .zip(self.agents.velocity.par_iter_mut())
                .zip(self.scratch.par_iter())
                .for_each(|((position, velocity), scratch)| {
                    *velocity = scratch.new_velocity;
                    *position += *velocity * time_step;
                });
        }

        self.global_time += self.time_step;
        observer.on_step_end(self.global_time);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` if the tube of `radius` around the segment from `q1` to `q2`
    /// crosses no obstacle edge.
    pub fn query_visibility(&self, q1: Vec2, q2: Vec2, radius: f32) -> bool {
        self.obstacle_tree
            .query_visibility(&self.obstacles, q1, q2, radius)
    }

    pub fn num_agents(&self) -> usize {
        self.agents.count
    }

    pub fn num_obstacle_vertices(&self) -> usize {
        self.obstacles.len()
    }

    pub fn global_time(&self) -> f32 {
        self.global_time
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    pub fn set_time_step(&mut self, time_step: f32) {
        self.time_step = time_step;
    }

    /// Read-only view of the agent store (positions, velocities, parameters).
    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    // ── Per-agent accessors ───────────────────────────────────────────────

    pub fn agent_position(&self, agent: AgentId) -> Vec2 {
        self.agents.position[agent.index()]
    }

    pub fn agent_velocity(&self, agent: AgentId) -> Vec2 {
        self.agents.velocity[agent.index()]
    }

    pub fn agent_pref_velocity(&self, agent: AgentId) -> Vec2 {
        self.agents.pref_velocity[agent.index()]
    }

    pub fn agent_radius(&self, agent: AgentId) -> f32 {
        self.agents.params[agent.index()].radius
    }

    pub fn agent_max_speed(&self, agent: AgentId) -> f32 {
        self.agents.params[agent.index()].max_speed
    }

    pub fn agent_max_neighbors(&self, agent: AgentId) -> usize {
        self.agents.params[agent.index()].max_neighbors
    }

    pub fn agent_neighbor_dist(&self, agent: AgentId) -> f32 {
        self.agents.params[agent.index()].neighbor_dist
    }

    pub fn agent_time_horizon(&self, agent: AgentId) -> f32 {
        self.agents.params[agent.index()].time_horizon
    }

    pub fn agent_time_horizon_obst(&self, agent: AgentId) -> f32 {
        self.agents.params[agent.index()].time_horizon_obst
    }

    /// Number of agent neighbors found for `agent` in the last step.
    pub fn num_agent_neighbors(&self, agent: AgentId) -> usize {
        self.scratch[agent.index()].agent_neighbors.len()
    }

    /// The `k`-th nearest agent neighbor of `agent` from the last step.
    pub fn agent_agent_neighbor(&self, agent: AgentId, k: usize) -> AgentId {
        self.scratch[agent.index()].agent_neighbors.entries()[k].1
    }

    /// Number of obstacle edges near `agent` in the last step.
    pub fn num_obstacle_neighbors(&self, agent: AgentId) -> usize {
        self.scratch[agent.index()].obstacle_neighbors.len()
    }

    /// The `k`-th obstacle neighbor of `agent` from the last step, as the
    /// edge's first vertex id.
    pub fn agent_obstacle_neighbor(&self, agent: AgentId, k: usize) -> VertexId {
        self.scratch[agent.index()].obstacle_neighbors[k].1
    }

    /// Number of half-plane constraints derived for `agent` in the last step.
    pub fn num_orca_lines(&self, agent: AgentId) -> usize {
        self.scratch[agent.index()].orca_lines.len()
    }

    /// The `k`-th half-plane constraint of `agent` from the last step.
    /// Obstacle constraints come first.
    pub fn agent_orca_line(&self, agent: AgentId, k: usize) -> Line {
        self.scratch[agent.index()].orca_lines[k]
    }

    // ── Obstacle accessors ────────────────────────────────────────────────

    pub fn obstacle_vertex(&self, vertex: VertexId) -> Vec2 {
        self.obstacles[vertex].point
    }

    pub fn next_obstacle_vertex(&self, vertex: VertexId) -> VertexId {
        self.obstacles.next(vertex)
    }

    pub fn prev_obstacle_vertex(&self, vertex: VertexId) -> VertexId {
        self.obstacles.prev(vertex)
    }

    // ── Per-agent mutators ────────────────────────────────────────────────

    pub fn set_agent_position(&mut self, agent: AgentId, position: Vec2) {
        self.agents.position[agent.index()] = position;
    }

    pub fn set_agent_velocity(&mut self, agent: AgentId, velocity: Vec2) {
        self.agents.velocity[agent.index()] = velocity;
    }

    pub fn set_agent_radius(&mut self, agent: AgentId, radius: f32) {
        self.agents.params[agent.index()].radius = radius;
    }

    pub fn set_agent_max_speed(&mut self, agent: AgentId, max_speed: f32) {
        self.agents.params[agent.index()].max_speed = max_speed;
    }

    pub fn set_agent_max_neighbors(&mut self, agent: AgentId, max_neighbors: usize) {
        self.agents.params[agent.index()].max_neighbors = max_neighbors;
    }

    pub fn set_agent_neighbor_dist(&mut self, agent: AgentId, neighbor_dist: f32) {
        self.agents.params[agent.index()].neighbor_dist = neighbor_dist;
    }

    pub fn set_agent_time_horizon(&mut self, agent: AgentId, time_horizon: f32) {
        self.agents.params[agent.index()].time_horizon = time_horizon;
    }

    pub fn set_agent_time_horizon_obst(&mut self, agent: AgentId, time_horizon_obst: f32) {
        self.agents.params[agent.index()].time_horizon_obst = time_horizon_obst;
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

// ── Per-agent compute ─────────────────────────────────────────────────────────

/// Gather neighbors and stage the new velocity for one agent.
///
/// Pure with respect to everything except `scratch`; safe to run for all
/// agents concurrently.
fn compute_agent(
    agent: AgentId,
    store: &AgentStore,
    scratch: &mut AgentScratch,
    agent_tree: &AgentKdTree,
    obstacle_tree: &ObstacleKdTree,
    obstacles: &ObstacleMap,
    time_step: f32,
) {
    let params = store.params[agent.index()];
    let position = store.position[agent.index()];

    // ── Neighbors ─────────────────────────────────────────────────────────
    let obstacle_range = params.time_horizon_obst * params.max_speed + params.radius;
    scratch.obstacle_neighbors.clear();
    obstacle_tree.query_neighbors(
        obstacles,
        position,
        obstacle_range * obstacle_range,
        &mut scratch.obstacle_neighbors,
    );

    scratch
        .agent_neighbors
        .reset(params.max_neighbors, params.neighbor_dist * params.neighbor_dist);
    if params.max_neighbors > 0 {
        agent_tree.query(&store.position, agent, &mut scratch.agent_neighbors);
    }

    // ── Constraints: obstacle lines first, then agent lines ───────────────
    let body = Body {
        position,
        velocity: store.velocity[agent.index()],
        radius: params.radius,
    };

    scratch.orca_lines.clear();
    for k in 0..scratch.obstacle_neighbors.len() {
        let edge = scratch.obstacle_neighbors[k].1;
        if let Some(line) = obstacle_line(
            &body,
            params.time_horizon_obst,
            edge,
            obstacles,
            &scratch.orca_lines,
        ) {
            scratch.orca_lines.push(line);
        }
    }
    scratch.obstacle_line_count = scratch.orca_lines.len();

    for &(_, other) in scratch.agent_neighbors.entries() {
        let other_body = Body {
            position: store.position[other.index()],
            velocity: store.velocity[other.index()],
            radius: store.params[other.index()].radius,
        };
        scratch
            .orca_lines
            .push(agent_line(&body, &other_body, params.time_horizon, time_step));
    }

    // ── Velocity selection ────────────────────────────────────────────────
    let (new_velocity, used_fallback) = avoiding_velocity(
        &scratch.orca_lines,
        scratch.obstacle_line_count,
        params.max_speed,
        store.pref_velocity[agent.index()],
    );
    scratch.new_velocity = new_velocity;
    scratch.used_fallback = used_fallback;
}
