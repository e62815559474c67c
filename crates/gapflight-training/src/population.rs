use gapflight_engine::{Agent, AgentSprite, Control, GapColumn};
use tracing::trace;

/// One cohort of agents evaluated together.
///
/// A run keeps two of these side by side: the freshly bred generation and
/// the survivors carried over from the previous one. Each cohort tracks
/// its own alive count, so neither depends on the other's indices.
#[derive(Debug, Clone, Default)]
pub struct Population {
    generation: u32,
    agents: Vec<Agent>,
    alive: usize,
}

impl Population {
    #[must_use]
    pub fn new(generation: u32, agents: Vec<Agent>) -> Self {
        let alive = agents.iter().filter(|a| a.is_alive()).count();
        Self {
            generation,
            agents,
            alive,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn into_agents(self) -> Vec<Agent> {
        self.agents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive
    }

    /// Returns `true` once every agent is dead.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.alive == 0
    }

    /// Best fitness in the cohort, or `None` if it is empty.
    #[must_use]
    pub fn max_fitness(&self) -> Option<u32> {
        self.agents.iter().map(Agent::fitness).max()
    }

    /// Steps every living agent and kills those that collided or went past `ceiling`.
    ///
    /// A killed agent's fitness is frozen at `camera`. Returns the number of
    /// agents that died during this tick.
    pub fn step(&mut self, window: &[GapColumn], camera: u32, ceiling: u32) -> usize {
        let mut deaths = 0;
        for (index, agent) in self.agents.iter_mut().enumerate() {
            if !agent.is_alive() {
                continue;
            }
            let outcome = agent.step(window, camera, Control::None);
            if outcome.collided || camera > ceiling {
                agent.kill(camera);
                deaths += 1;
                trace!(
                    generation = self.generation,
                    index,
                    fitness = camera,
                    capped = !outcome.collided,
                    "agent finished"
                );
            }
        }
        self.alive -= deaths;
        deaths
    }

    /// Render sprites of the living agents.
    pub fn sprites(&self, carried_over: bool) -> impl Iterator<Item = AgentSprite> + '_ {
        self.agents
            .iter()
            .filter(|a| a.is_alive())
            .map(move |a| AgentSprite::of(a, carried_over))
    }

    /// First living agent, if any.
    #[must_use]
    pub fn first_alive(&self) -> Option<&Agent> {
        self.agents.iter().find(|a| a.is_alive())
    }
}

#[cfg(test)]
mod tests {
    use gapflight_engine::{Genome, Mode};

    use super::*;

    fn cohort(mode: Mode, count: usize) -> Population {
        Population::new(1, (0..count).map(|_| Agent::new(mode, Genome::zeroed())).collect())
    }

    #[test]
    fn test_new_counts_alive() {
        let mut agents: Vec<_> = (0..3)
            .map(|_| Agent::new(Mode::Thrust, Genome::zeroed()))
            .collect();
        agents[1].kill(10);
        let population = Population::new(1, agents);
        assert_eq!(population.len(), 3);
        assert_eq!(population.alive_count(), 2);
    }

    #[test]
    fn test_ceiling_kills_everyone() {
        let mut population = cohort(Mode::Thrust, 4);
        let deaths = population.step(&[], 108, 100);
        assert_eq!(deaths, 4);
        assert!(population.is_done());
        assert!(population.agents().iter().all(|a| a.fitness() == 108));
    }

    #[test]
    fn test_camera_equal_to_ceiling_is_not_capped() {
        let mut population = cohort(Mode::Thrust, 2);
        assert_eq!(population.step(&[], 100, 100), 0);
        assert_eq!(population.alive_count(), 2);
    }

    #[test]
    fn test_collisions_reduce_alive_count() {
        let mut population = cohort(Mode::Gravity, 3);
        let mut camera = 0;
        while !population.is_done() {
            camera += 8;
            population.step(&[], camera, u32::MAX);
        }
        let fitness = population.max_fitness().unwrap();
        assert!(fitness > 0 && fitness < 200);
        assert_eq!(population.sprites(false).count(), 0);
        assert!(population.first_alive().is_none());
    }

    #[test]
    fn test_empty_population() {
        let population = Population::default();
        assert!(population.is_done());
        assert_eq!(population.max_fitness(), None);
    }
}
