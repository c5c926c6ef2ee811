//! # Game State Module
//!
//! The turn engine. [`GameState`] exclusively owns the floor, the roster, the
//! player and every RNG draw, and resolves one complete turn per call to
//! [`GameState::take_turn`]:
//!
//! 1. apply the player's action (move, bump attack, cast, item use)
//! 2. let every live non-player agent decide and act, in roster order
//! 3. tick every status effect
//! 4. decrement cooldowns and regenerate the player's resource
//! 5. sweep dead agents, emitting one defeat event each
//! 6. end the encounter if the player died
//!
//! A rejected action returns an error before anything is mutated, including
//! the RNG stream.

use crate::ai;
use crate::config::{INVENTORY_CAPACITY, LOOT_DROP_CHANCE, RESOURCE_REGEN_PER_TURN};
use crate::game::{
    seeded_entity_id, Agent, AgentDecision, Behavior, Character, Direction, DungeonMap, EntityId,
    Faction, GameEvent, Inventory, Job, PlayerAction, Position, Roster, SaveSnapshot, TileType,
};
use crate::generation::{
    monster_template, DungeonGenerator, EncounterGenerator, GenerationConfig, LootGenerator,
    ALLY_TEMPLATES,
};
use crate::items::{ConsumableEffect, Slot};
use crate::skills::{cast, skill_def, StateDelta, TargetHint};
use crate::utils::{mitigate, nearest_free, roll_with_variance};
use crate::{DelveError, DelveResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Running totals for the current run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Hostiles removed by the death sweep
    pub enemies_defeated: u32,
    /// Deepest floor reached
    pub max_depth_reached: u32,
    /// Items that made it into the inventory from drops
    pub items_looted: u32,
    /// Damage dealt to anything but the player
    pub damage_dealt: u64,
    /// Damage taken by the player
    pub damage_taken: u64,
    /// Tiles moved by the player
    pub steps_taken: u64,
}

impl GameStatistics {
    /// Updates statistics based on a turn event.
    pub fn update_from_event(&mut self, event: &GameEvent, player_id: EntityId) {
        match event {
            GameEvent::Moved { agent_id, .. } if *agent_id == player_id => {
                self.steps_taken += 1;
            }
            GameEvent::Damage {
                target_id, amount, ..
            } => {
                if *target_id == player_id {
                    self.damage_taken += *amount as u64;
                } else {
                    self.damage_dealt += *amount as u64;
                }
            }
            GameEvent::ItemLooted { .. } => self.items_looted += 1,
            GameEvent::FloorTransition { floor } => {
                self.max_depth_reached = self.max_depth_reached.max(*floor);
            }
            _ => {}
        }
    }
}

/// Complete simulation state.
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GenerationConfig,
    pub map: DungeonMap,
    /// Every non-player agent on the floor, in turn order
    pub roster: Roster,
    pub player: Agent,
    pub character: Character,
    pub inventory: Inventory,
    pub floor: u32,
    pub turn_number: u64,
    pub statistics: GameStatistics,
    pub active_quests: Vec<String>,
    pub completed_quests: Vec<String>,
    rng: StdRng,
    turn_in_progress: bool,
    encounter_over: bool,
    targeting: Option<String>,
    dungeon: DungeonGenerator,
    encounters: EncounterGenerator,
    loot: LootGenerator,
}

impl GameState {
    /// Starts a new run on floor 1 with the standard configuration.
    pub fn new(seed: u64, job: Job) -> DelveResult<Self> {
        Self::with_config(GenerationConfig::new(seed), job)
    }

    /// Starts a new run on floor 1.
    pub fn with_config(config: GenerationConfig, job: Job) -> DelveResult<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let dungeon = DungeonGenerator::new(config.clone());
        let encounters = EncounterGenerator::new(config.clone());

        let map = dungeon.generate_floor(1, &mut rng)?;
        let hostiles = encounters.populate(&map, &[map.start], &mut rng);
        let character = Character::new("Adventurer", job);
        let player = player_agent(&character, map.start).with_id(seeded_entity_id(&mut rng));

        let mut state = Self {
            config,
            roster: Roster::from_agents(hostiles),
            player,
            character,
            inventory: Inventory::new(INVENTORY_CAPACITY),
            floor: 1,
            turn_number: 0,
            statistics: GameStatistics {
                max_depth_reached: 1,
                ..GameStatistics::default()
            },
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            rng,
            turn_in_progress: false,
            encounter_over: false,
            targeting: None,
            dungeon,
            encounters,
            loot: LootGenerator::new(),
            map,
        };
        state.refresh_player_stats();
        info!(
            "new {} run, seed {}, {} hostile(s) on floor 1",
            job,
            state.config.seed,
            state.roster.len()
        );
        Ok(state)
    }

    /// Discards the run and starts over from the same seed and job.
    pub fn reset(&mut self) -> DelveResult<()> {
        *self = Self::with_config(self.config.clone(), self.character.job)?;
        Ok(())
    }

    pub fn is_encounter_over(&self) -> bool {
        self.encounter_over
    }

    pub fn is_turn_in_progress(&self) -> bool {
        self.turn_in_progress
    }

    /// Next value of the simulation RNG, without advancing it.
    pub fn rng_fingerprint(&self) -> u64 {
        self.rng.clone().gen()
    }

    /// Persistence record of the current run.
    pub fn snapshot(&self, timestamp: u64) -> SaveSnapshot {
        SaveSnapshot::from_state(self, timestamp)
    }

    /// Text view of the floor with every live agent drawn over it.
    pub fn render(&self) -> String {
        let mut rows: Vec<Vec<char>> = self.map.render().lines().map(|l| l.chars().collect()).collect();
        let mut draw = |pos: Position, glyph: char| {
            if let Some(cell) = rows
                .get_mut(pos.y as usize)
                .and_then(|row| row.get_mut(pos.x as usize))
            {
                *cell = glyph;
            }
        };
        for agent in self.roster.iter().filter(|a| a.is_alive()) {
            let glyph = match agent.faction {
                Faction::Ally => 'A',
                _ => agent.template_id.chars().next().unwrap_or('?'),
            };
            draw(agent.position, glyph);
        }
        draw(self.player.position, '@');
        rows.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Looks up the player or a roster agent.
    pub fn agent(&self, id: EntityId) -> Option<&Agent> {
        if id == self.player.id {
            Some(&self.player)
        } else {
            self.roster.get(id)
        }
    }

    fn agent_mut(&mut self, id: EntityId) -> Option<&mut Agent> {
        if id == self.player.id {
            Some(&mut self.player)
        } else {
            self.roster.get_mut(id)
        }
    }

    // ------------------------------------------------------------------
    // Target selection
    // ------------------------------------------------------------------

    /// Starts choosing a target for `skill`. Nothing is resolved yet.
    pub fn begin_targeting(&mut self, skill: &str) -> DelveResult<()> {
        self.ensure_accepting_input()?;
        let def = skill_def(skill).ok_or_else(|| DelveError::UnknownSkill(skill.to_string()))?;
        if self.character.skill_level(def.id) == 0 {
            return Err(DelveError::SkillLocked(format!("{} has not been learned", def.name)));
        }
        self.targeting = Some(def.id.to_string());
        Ok(())
    }

    /// Aborts target selection, returning the skill that was being aimed.
    pub fn cancel_targeting(&mut self) -> Option<String> {
        self.targeting.take()
    }

    pub fn targeting(&self) -> Option<&str> {
        self.targeting.as_deref()
    }

    /// Casts the skill being aimed and runs the turn.
    ///
    /// On a rejected cast the selection stays open so another target can be
    /// chosen.
    pub fn commit_target(&mut self, target: Option<TargetHint>) -> DelveResult<Vec<GameEvent>> {
        let skill = self
            .targeting
            .clone()
            .ok_or_else(|| DelveError::InvalidState("no skill is being targeted".to_string()))?;
        let events = self.take_turn(PlayerAction::Cast { skill, target })?;
        self.targeting = None;
        Ok(events)
    }

    // ------------------------------------------------------------------
    // Progression outside of turns
    // ------------------------------------------------------------------

    /// Spends a skill point on `skill`.
    pub fn learn_skill(&mut self, skill: &str) -> DelveResult<u32> {
        self.ensure_accepting_input()?;
        let level = self.character.learn_skill(skill)?;
        self.refresh_player_stats();
        Ok(level)
    }

    /// Adds a cooperative agent next to the player.
    pub fn recruit_ally(&mut self, template_id: &str) -> DelveResult<EntityId> {
        self.ensure_accepting_input()?;
        let template = ALLY_TEMPLATES
            .iter()
            .find(|t| t.id == template_id)
            .ok_or_else(|| DelveError::InvalidAction(format!("no ally named {template_id}")))?;
        let occupied = self.occupied_positions();
        let position = nearest_free(&self.map, &occupied, self.player.position)
            .ok_or_else(|| DelveError::InvalidAction("no room for an ally".to_string()))?;
        let ally = template.spawn(self.floor, position, Faction::Ally, &mut self.rng);
        Ok(self.roster.push(ally))
    }

    fn ensure_accepting_input(&self) -> DelveResult<()> {
        if self.encounter_over {
            return Err(DelveError::EncounterOver);
        }
        if self.turn_in_progress {
            return Err(DelveError::TurnInProgress);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Turn resolution
    // ------------------------------------------------------------------

    /// Resolves one full turn.
    ///
    /// Returns the turn's events in resolution order, or an error if the
    /// player's action was rejected, in which case nothing changed.
    pub fn take_turn(&mut self, action: PlayerAction) -> DelveResult<Vec<GameEvent>> {
        self.ensure_accepting_input()?;
        self.turn_in_progress = true;
        let result = self.resolve_turn(action);
        self.turn_in_progress = false;
        result
    }

    fn resolve_turn(&mut self, action: PlayerAction) -> DelveResult<Vec<GameEvent>> {
        let mut events = Vec::new();

        // 1. player action
        if self.player.is_disabled() {
            debug!("player is disabled, action {:?} skipped", action);
        } else {
            self.apply_player_action(action, &mut events)?;
        }

        let descended = self.map.tile(self.player.position) == Some(TileType::Stairs);
        if descended {
            self.descend(&mut events)?;
        } else {
            // 2. agents act
            self.run_agents(&mut events);
        }

        // 3. status ticks
        self.tick_statuses(&mut events);

        // 4. cooldowns and resource regeneration
        self.player.decay_cooldowns();
        for agent in self.roster.iter_mut() {
            agent.decay_cooldowns();
        }
        self.player.resource = (self.player.resource + RESOURCE_REGEN_PER_TURN).min(self.player.max_resource);

        // 5. death sweep
        self.sweep_dead(&mut events);

        // 6. game over
        if !self.player.is_alive() {
            self.encounter_over = true;
            info!("player died on floor {} at turn {}", self.floor, self.turn_number);
            events.push(GameEvent::GameOver);
        }

        self.refresh_player_stats();
        self.turn_number += 1;
        for event in &events {
            self.statistics.update_from_event(event, self.player.id);
        }
        Ok(events)
    }

    fn apply_player_action(&mut self, action: PlayerAction, events: &mut Vec<GameEvent>) -> DelveResult<()> {
        match action {
            PlayerAction::Move(direction) => self.player_move(direction, events),
            PlayerAction::Cast { skill, target } => {
                let delta = cast(
                    &skill,
                    &self.player,
                    &self.character.learned_skills,
                    &self.roster,
                    target,
                    &mut self.rng,
                )?;
                self.apply_delta(delta, events);
                Ok(())
            }
            PlayerAction::UseItem(id) => self.use_item(id, events),
            PlayerAction::Equip(id) => self.equip(id),
            PlayerAction::Unequip(slot) => self.unequip(slot),
            PlayerAction::Wait => Ok(()),
        }
    }

    fn player_move(&mut self, direction: Direction, events: &mut Vec<GameEvent>) -> DelveResult<()> {
        let from = self.player.position;
        let to = from.step(direction);
        if !self.map.is_walkable(to) {
            return Err(DelveError::InvalidAction(format!("{} is blocked", to)));
        }

        let occupant = self.roster.agent_at(to).map(|a| (a.id, a.faction));
        match occupant {
            Some((target, faction)) if self.player.faction.is_opposed_to(faction) => {
                let raw = roll_with_variance(self.player.effective_attack(), &mut self.rng);
                self.deal_damage(Some(self.player.id), target, raw, events);
            }
            Some((ally, _)) => {
                if let Some(agent) = self.roster.get_mut(ally) {
                    agent.position = from;
                }
                self.player.position = to;
                events.push(GameEvent::Swapped {
                    player_id: self.player.id,
                    ally_id: ally,
                });
            }
            None => {
                self.player.position = to;
                events.push(GameEvent::Moved {
                    agent_id: self.player.id,
                    from,
                    to,
                });
            }
        }
        Ok(())
    }

    fn use_item(&mut self, id: EntityId, events: &mut Vec<GameEvent>) -> DelveResult<()> {
        let item = self
            .inventory
            .get(id)
            .ok_or_else(|| DelveError::InvalidAction(format!("no item {id}")))?;
        let effect = item
            .consumable()
            .ok_or_else(|| DelveError::InvalidAction(format!("{} cannot be used", item.name)))?;

        let item = self.inventory.take(id)?;
        match effect {
            ConsumableEffect::Heal(amount) => {
                let healed = self.player.heal(amount);
                events.push(GameEvent::Healed {
                    agent_id: self.player.id,
                    amount: healed,
                });
            }
            ConsumableEffect::RestoreResource(amount) => {
                self.player.resource = (self.player.resource + amount).min(self.player.max_resource);
            }
        }
        events.push(GameEvent::ItemUsed {
            item_id: item.id,
            template_id: item.template_id,
        });
        Ok(())
    }

    fn equip(&mut self, id: EntityId) -> DelveResult<()> {
        let item = self
            .inventory
            .get(id)
            .ok_or_else(|| DelveError::InvalidAction(format!("no item {id}")))?;
        if !item.is_equipment() {
            return Err(DelveError::InvalidAction(format!("{} cannot be equipped", item.name)));
        }

        let item = self.inventory.take(id)?;
        self.sync_pools_to_character();
        if let Some(previous) = self.character.equip(item)? {
            // The slot freed by the new item always has room for the old one
            self.inventory.try_add(previous)?;
        }
        self.refresh_player_stats();
        Ok(())
    }

    fn unequip(&mut self, slot: Slot) -> DelveResult<()> {
        if !self.character.equipment.contains_key(&slot) {
            return Err(DelveError::InvalidAction(format!("nothing equipped in {:?}", slot)));
        }
        if self.inventory.is_full() {
            return Err(DelveError::InventoryFull);
        }
        self.sync_pools_to_character();
        if let Some(item) = self.character.unequip(slot) {
            self.inventory.try_add(item)?;
        }
        self.refresh_player_stats();
        Ok(())
    }

    fn apply_delta(&mut self, delta: StateDelta, events: &mut Vec<GameEvent>) {
        let caster = delta.caster;
        if let Some(agent) = self.agent_mut(caster) {
            agent.resource = agent.resource.saturating_sub(delta.resource_spent);
            if let Some(cooldown) = delta.cooldown {
                agent.set_cooldown(delta.skill, cooldown);
            }
            for toggle in &delta.removed_toggles {
                agent.statuses.remove_toggle(*toggle);
            }
        }
        for toggle in &delta.removed_toggles {
            events.push(GameEvent::ToggleOff {
                agent_id: caster,
                skill: *toggle,
            });
        }
        if delta.is_deactivation() {
            return;
        }

        events.push(GameEvent::SkillCast {
            caster_id: caster,
            skill: delta.skill,
        });
        for &(target, amount) in &delta.damage {
            self.apply_final_damage(Some(caster), target, amount, events);
        }
        for &(target, amount) in &delta.healing {
            if let Some(agent) = self.agent_mut(target) {
                let healed = agent.heal(amount);
                events.push(GameEvent::Healed {
                    agent_id: target,
                    amount: healed,
                });
            }
        }
        for (target, status) in delta.statuses {
            if let Some(agent) = self.agent_mut(target) {
                let kind = status.kind;
                agent.statuses.apply(status);
                events.push(GameEvent::StatusApplied {
                    agent_id: target,
                    status: kind,
                });
            }
        }
    }

    /// Applies `raw` damage reduced by the target's defense.
    fn deal_damage(
        &mut self,
        source: Option<EntityId>,
        target: EntityId,
        raw: i32,
        events: &mut Vec<GameEvent>,
    ) {
        let defense = self.agent(target).map_or(0, |a| a.effective_defense());
        self.apply_final_damage(source, target, mitigate(raw, defense), events);
    }

    fn apply_final_damage(
        &mut self,
        source: Option<EntityId>,
        target: EntityId,
        amount: i32,
        events: &mut Vec<GameEvent>,
    ) {
        if let Some(agent) = self.agent_mut(target) {
            if !agent.is_alive() {
                return;
            }
            agent.take_damage(amount);
            events.push(GameEvent::Damage {
                source_id: source,
                target_id: target,
                amount,
            });
        }
    }

    fn run_agents(&mut self, events: &mut Vec<GameEvent>) {
        for id in self.roster.ids() {
            let decision = match self.roster.get(id) {
                Some(agent) if agent.is_alive() => {
                    ai::decide(agent, &self.roster, &self.player, &self.map, &mut self.rng)
                }
                _ => continue,
            };

            match decision {
                AgentDecision::MoveTo(to) => self.agent_move(id, to, events),
                AgentDecision::Attack(target) => self.agent_attack(id, target, events),
                AgentDecision::Idle => {}
            }
        }
    }

    /// Moves an agent after re-checking the tile; earlier movers may have
    /// taken it this turn.
    fn agent_move(&mut self, id: EntityId, to: Position, events: &mut Vec<GameEvent>) {
        let free = self.map.is_walkable(to)
            && to != self.player.position
            && self.roster.agent_at(to).is_none();
        if !free {
            return;
        }
        if let Some(agent) = self.roster.get_mut(id) {
            if agent.position.manhattan_distance(to) != 1 {
                return;
            }
            let from = agent.position;
            agent.position = to;
            events.push(GameEvent::Moved {
                agent_id: id,
                from,
                to,
            });
        }
    }

    fn agent_attack(&mut self, id: EntityId, target: EntityId, events: &mut Vec<GameEvent>) {
        let Some(attacker) = self.roster.get(id) else {
            return;
        };
        let (attack, range, origin) = (attacker.effective_attack(), attacker.attack_range, attacker.position);
        let in_reach = self
            .agent(target)
            .map_or(false, |t| t.is_alive() && origin.manhattan_distance(t.position) <= range);
        if !in_reach {
            return;
        }
        let raw = roll_with_variance(attack, &mut self.rng);
        self.deal_damage(Some(id), target, raw, events);
    }

    fn tick_statuses(&mut self, events: &mut Vec<GameEvent>) {
        let mut ids = vec![self.player.id];
        ids.extend(self.roster.ids());

        for id in ids {
            let Some(agent) = self.agent_mut(id) else {
                continue;
            };
            if !agent.is_alive() {
                continue;
            }
            let tick = agent.statuses.tick();
            for (source, _, amount) in &tick.damage {
                agent.take_damage(*amount);
                events.push(GameEvent::Damage {
                    source_id: *source,
                    target_id: id,
                    amount: *amount,
                });
            }
            if tick.healing > 0 && agent.is_alive() {
                let healed = agent.heal(tick.healing);
                events.push(GameEvent::Healed {
                    agent_id: id,
                    amount: healed,
                });
            }
            for status in tick.expired {
                events.push(GameEvent::StatusExpired {
                    agent_id: id,
                    status,
                });
            }
        }
    }

    fn sweep_dead(&mut self, events: &mut Vec<GameEvent>) {
        for agent in self.roster.remove_dead() {
            debug!("{} defeated", agent.name);
            events.push(GameEvent::Defeated {
                agent_id: agent.id,
                template_id: agent.template_id.clone(),
            });
            if agent.faction == Faction::Hostile {
                self.statistics.enemies_defeated += 1;
                self.reward(&agent, events);
            }
        }
    }

    /// Experience, gold and a possible item drop for a defeated hostile.
    fn reward(&mut self, defeated: &Agent, events: &mut Vec<GameEvent>) {
        let Some(template) = monster_template(&defeated.template_id) else {
            return;
        };

        let (low, high) = template.gold;
        let gold = self.rng.gen_range(low..=high.max(low));
        if gold > 0 {
            self.inventory.add_gold(gold);
            events.push(GameEvent::GoldGained { amount: gold });
        }

        if self.rng.gen_bool(LOOT_DROP_CHANCE) {
            if let Some(item) = self.loot.generate_item(self.character.level, None, &mut self.rng) {
                let (item_id, name) = (item.id, item.name.clone());
                match self.inventory.try_add(item) {
                    Ok(()) => events.push(GameEvent::ItemLooted { item_id, name }),
                    Err(_) => {
                        debug!("inventory full, {} is lost", name);
                        events.push(GameEvent::LootLost { name });
                    }
                }
            }
        }

        let before = self.character.level;
        if self.character.gain_xp(template.xp) > 0 {
            for level in before + 1..=self.character.level {
                events.push(GameEvent::LevelUp { level });
            }
            // A level up restores the player completely
            self.refresh_player_stats();
            self.player.hp = self.player.max_hp;
            self.player.resource = self.player.max_resource;
        }
    }

    /// Replaces the floor with the next one. Allies follow the player.
    fn descend(&mut self, events: &mut Vec<GameEvent>) -> DelveResult<()> {
        let next = self.floor + 1;
        let map = self.dungeon.generate_floor(next, &mut self.rng)?;

        let mut occupied = vec![map.start];
        let mut allies = Vec::new();
        for mut ally in self
            .roster
            .extract(|a| a.faction == Faction::Ally && a.is_alive())
        {
            match nearest_free(&map, &occupied, map.start) {
                Some(position) => {
                    ally.position = position;
                    occupied.push(position);
                    allies.push(ally);
                }
                None => warn!("no room for {} on floor {}", ally.name, next),
            }
        }

        let hostiles = self.encounters.populate(&map, &occupied, &mut self.rng);
        allies.extend(hostiles);

        self.player.position = map.start;
        self.roster = Roster::from_agents(allies);
        self.map = map;
        self.floor = next;
        info!(
            "descended to floor {}{}",
            next,
            if self.map.is_arena { " (arena)" } else { "" }
        );
        events.push(GameEvent::FloorTransition { floor: next });
        Ok(())
    }

    fn occupied_positions(&self) -> Vec<Position> {
        std::iter::once(self.player.position)
            .chain(self.roster.iter().filter(|a| a.is_alive()).map(|a| a.position))
            .collect()
    }

    fn sync_pools_to_character(&mut self) {
        self.character.current_hp = self.player.hp;
        self.character.current_mp = self.player.resource;
    }

    /// Recomputes the player's combat stats from the character.
    ///
    /// Aggregated stats are the only source of the player's attack, defense
    /// and pool maxima; current pools are clamped to the new maxima.
    fn refresh_player_stats(&mut self) {
        self.sync_pools_to_character();
        let stats = self.character.final_stats();
        self.player.attack = stats.attack;
        self.player.defense = stats.defense;
        self.player.max_hp = stats.max_hp;
        self.player.hp = self.player.hp.min(stats.max_hp);
        self.player.max_resource = stats.max_mp.max(0) as u32;
        self.player.resource = self.player.resource.min(self.player.max_resource);
        self.sync_pools_to_character();
    }
}

fn player_agent(character: &Character, position: Position) -> Agent {
    let stats = character.final_stats();
    let mut player = Agent::new(
        "player",
        character.name.clone(),
        position,
        stats.max_hp,
        stats.attack,
        stats.defense,
        Behavior::Stationary,
        Faction::Player,
    );
    player.max_resource = stats.max_mp.max(0) as u32;
    player.resource = player.max_resource;
    player
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{StatusEffect, StatusKind};
    use crate::items::{item_template, ItemInstance};

    fn quiet_state(job: Job) -> GameState {
        let mut state = GameState::with_config(GenerationConfig::for_testing(21), job).unwrap();
        state.roster = Roster::new();
        state
    }

    fn open_direction(state: &GameState) -> Direction {
        Direction::all()
            .into_iter()
            .find(|d| {
                let to = state.player.position.step(*d);
                state.map.tile(to) == Some(TileType::Floor)
            })
            .unwrap()
    }

    #[test]
    fn test_new_state() {
        let state = GameState::with_config(GenerationConfig::for_testing(5), Job::Warrior).unwrap();
        assert_eq!(state.floor, 1);
        assert_eq!(state.player.position, state.map.start);
        assert_eq!(state.player.hp, state.player.max_hp);
        assert!(!state.is_encounter_over());
        assert!(!state.is_turn_in_progress());
    }

    #[test]
    fn test_wait_advances_turn() {
        let mut state = quiet_state(Job::Warrior);
        state.take_turn(PlayerAction::Wait).unwrap();
        state.take_turn(PlayerAction::Wait).unwrap();
        assert_eq!(state.turn_number, 2);
    }

    #[test]
    fn test_move_emits_event() {
        let mut state = quiet_state(Job::Warrior);
        let direction = open_direction(&state);
        let from = state.player.position;

        let events = state.take_turn(PlayerAction::Move(direction)).unwrap();
        assert_eq!(state.player.position, from.step(direction));
        assert!(events.contains(&GameEvent::Moved {
            agent_id: state.player.id,
            from,
            to: from.step(direction),
        }));
    }

    #[test]
    fn test_bump_attack_does_not_move() {
        let mut state = quiet_state(Job::Warrior);
        let direction = open_direction(&state);
        let from = state.player.position;
        let target_pos = from.step(direction);
        let target = state.roster.push(Agent::new(
            "mold",
            "Mold",
            target_pos,
            500,
            0,
            0,
            Behavior::Stationary,
            Faction::Hostile,
        ));

        let events = state.take_turn(PlayerAction::Move(direction)).unwrap();
        assert_eq!(state.player.position, from);
        assert!(state.roster.get(target).unwrap().hp < 500);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Damage { target_id, .. } if *target_id == target)));
    }

    #[test]
    fn test_move_into_ally_swaps() {
        let mut state = quiet_state(Job::Warrior);
        let direction = open_direction(&state);
        let from = state.player.position;
        let ally_pos = from.step(direction);
        let ally = state.roster.push(Agent::new(
            "hound",
            "Hound",
            ally_pos,
            20,
            4,
            0,
            Behavior::Stationary,
            Faction::Ally,
        ));

        state.take_turn(PlayerAction::Move(direction)).unwrap();
        assert_eq!(state.player.position, ally_pos);
        assert_eq!(state.roster.get(ally).unwrap().position, from);
    }

    #[test]
    fn test_use_potion() {
        let mut state = quiet_state(Job::Warrior);
        let potion = ItemInstance::plain(item_template("healing_potion").unwrap());
        let id = potion.id;
        state.inventory.try_add(potion).unwrap();
        state.player.hp = 10;

        state.take_turn(PlayerAction::UseItem(id)).unwrap();
        assert!(state.player.hp > 10);
        assert!(state.inventory.get(id).is_none());
    }

    #[test]
    fn test_equip_and_unequip_update_stats() {
        let mut state = quiet_state(Job::Warrior);
        let sword = ItemInstance::plain(item_template("short_sword").unwrap());
        let id = sword.id;
        state.inventory.try_add(sword).unwrap();
        let base_attack = state.player.attack;

        state.take_turn(PlayerAction::Equip(id)).unwrap();
        assert!(state.player.attack > base_attack);
        assert!(state.inventory.is_empty());

        state.take_turn(PlayerAction::Unequip(Slot::Weapon)).unwrap();
        assert_eq!(state.player.attack, base_attack);
        assert_eq!(state.inventory.len(), 1);
    }

    #[test]
    fn test_stunned_player_loses_action() {
        let mut state = quiet_state(Job::Warrior);
        let direction = open_direction(&state);
        let from = state.player.position;
        state
            .player
            .statuses
            .apply(StatusEffect::timed(StatusKind::Stun, 1, 0, None));

        state.take_turn(PlayerAction::Move(direction)).unwrap();
        assert_eq!(state.player.position, from);
        assert!(!state.player.is_disabled());
    }

    #[test]
    fn test_targeting_cancel_and_commit() {
        let mut state = quiet_state(Job::Mage);
        state.begin_targeting("fireball").unwrap();
        assert_eq!(state.targeting(), Some("fireball"));
        assert_eq!(state.cancel_targeting().as_deref(), Some("fireball"));
        assert_eq!(state.turn_number, 0);

        assert!(matches!(
            state.begin_targeting("power_strike"),
            Err(DelveError::SkillLocked(_))
        ));

        state.begin_targeting("fireball").unwrap();
        let center = state.player.position;
        state.commit_target(Some(TargetHint::Tile(center))).unwrap();
        assert_eq!(state.targeting(), None);
        assert_eq!(state.turn_number, 1);
    }

    #[test]
    fn test_recruit_ally() {
        let mut state = quiet_state(Job::Rogue);
        let id = state.recruit_ally("sellsword").unwrap();
        let ally = state.roster.get(id).unwrap();
        assert_eq!(ally.faction, Faction::Ally);
        assert_ne!(ally.position, state.player.position);
        assert!(state.recruit_ally("dragon").is_err());
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut state = quiet_state(Job::Warrior);
        state.player.hp = 1;
        state
            .player
            .statuses
            .apply(StatusEffect::timed(StatusKind::Poison, 3, 5, None));

        let events = state.take_turn(PlayerAction::Wait).unwrap();
        assert!(events.contains(&GameEvent::GameOver));
        assert!(state.is_encounter_over());
        assert!(matches!(
            state.take_turn(PlayerAction::Wait),
            Err(DelveError::EncounterOver)
        ));

        state.reset().unwrap();
        assert!(!state.is_encounter_over());
        assert_eq!(state.turn_number, 0);
    }
}
