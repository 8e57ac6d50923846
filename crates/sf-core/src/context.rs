use std::collections::BTreeMap;

use sf_command::{Command, Datapack, Function, Identifier, ScheduleMode};
use sf_command::identifier::sanitize_segment;
use sf_nbt::{BlockWorld, CompoundTag, GenericBlockCollection};

use crate::asset::Models;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::io::{Output, resolve_target};
use crate::kind::InputCall;
use crate::level::Level;

/// Blocks entities read from the world during a full world pass, keyed by
/// entity name, for the logic pass to restore later.
pub type Captures = BTreeMap<String, GenericBlockCollection>;

/// What an entity sees while writing blocks.
#[derive(Debug)]
pub struct WorldContext<'a> {
    /// The block store being written.
    pub world: &'a mut BlockWorld,
    /// `false` during an edit-preview recompile.
    pub full: bool,
    /// The level's models, through its cache.
    pub models: Models<'a>,
    /// Blocks captured so far.
    pub captures: &'a mut Captures,
}

/// What an entity sees while emitting logic.
///
/// Owns the output dispatch: [`compile_output`](LogicContext::compile_output)
/// resolves every connection of a trigger and calls the target inputs in
/// connection order. Input chains that re-enter themselves without a delay
/// are rejected.
#[derive(Debug)]
pub struct LogicContext<'a> {
    level: &'a Level,
    datapack: &'a mut Datapack,
    init: Identifier,
    tick: Identifier,
    chain: Vec<(String, String)>,
    delayed: BTreeMap<DelayKey, Identifier>,
    captures: Option<&'a Captures>,
}

/// A delayed connection as fired: source, output index, target, instigator.
type DelayKey = (String, usize, String, String);

impl<'a> LogicContext<'a> {
    /// A context writing into `datapack`, whose `init` and `tick` functions
    /// already exist.
    pub fn new(level: &'a Level, datapack: &'a mut Datapack, init: Identifier, tick: Identifier) -> Self {
        Self {
            level,
            datapack,
            init,
            tick,
            chain: Vec::new(),
            delayed: BTreeMap::new(),
            captures: None,
        }
    }

    /// Builder-style captures from the world pass.
    pub fn with_captures(mut self, captures: &'a Captures) -> Self {
        self.captures = Some(captures);
        self
    }

    /// What the world pass captured for `entity`, if it ran.
    pub fn capture(&self, entity: &Entity) -> Option<&'a GenericBlockCollection> {
        self.captures.and_then(|c| c.get(entity.name()))
    }

    /// The level being compiled.
    pub fn level(&self) -> &'a Level {
        self.level
    }

    /// Identifier of the load function.
    pub fn init_id(&self) -> &Identifier {
        &self.init
    }

    /// Identifier of the tick function.
    pub fn tick_id(&self) -> &Identifier {
        &self.tick
    }

    /// Append commands to the load function.
    pub fn push_init(&mut self, commands: impl IntoIterator<Item = Command>) {
        let init = self.init.clone();
        self.datapack.function_entry(&init).extend(commands);
    }

    /// Append commands to the tick function.
    pub fn push_tick(&mut self, commands: impl IntoIterator<Item = Command>) {
        let tick = self.tick.clone();
        self.datapack.function_entry(&tick).extend(commands);
    }

    // -----------------------------------------------------------------------
    // Identifiers
    // -----------------------------------------------------------------------

    /// The entity's storage key: `namespace:entity`.
    pub fn storage_id(&self, entity: &Entity) -> CoreResult<Identifier> {
        Ok(self.datapack.id(&sanitize_segment(entity.name()))?)
    }

    /// A function belonging to the entity: `namespace:entity/name`.
    pub fn function_id(&self, entity: &Entity, name: &str) -> CoreResult<Identifier> {
        Ok(self.storage_id(entity)?.child(name)?)
    }

    /// Add a function to the datapack.
    pub fn add_function(&mut self, id: Identifier, commands: Vec<Command>) -> CoreResult<()> {
        let mut function = Function::new(id);
        function.extend(commands);
        Ok(self.datapack.add_function(function)?)
    }

    /// Register a default storage snapshot for the entity, restored on load.
    pub fn set_default_storage(&mut self, entity: &Entity, nbt: &CompoundTag) -> CoreResult<()> {
        let key = self.storage_id(entity)?;
        self.datapack.set_default_storage(key, nbt);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Commands for every connection of `source` matching `trigger`, in
    /// connection order.
    ///
    /// Missing targets are logged and skipped. A delayed connection becomes a
    /// helper function that is scheduled instead; the helper is built once
    /// per connection and starts a new input chain, so delayed loops compile.
    pub fn compile_output<'e>(
        &mut self,
        source: &'e Entity,
        trigger: &str,
        instigator: &'e Entity,
    ) -> CoreResult<Vec<Command>>
    where
        'a: 'e,
    {
        let level: &'e Level = self.level;
        let mut commands = Vec::new();
        for (index, output) in source.outputs().iter().enumerate() {
            if !output.matches(trigger) {
                continue;
            }
            let Some(target) = resolve_target(level, &output.target, source, instigator) else {
                log::warn!(
                    "entity \"{}\": output \"{}\" targets missing entity \"{}\"",
                    source.name(),
                    output.trigger,
                    output.target
                );
                continue;
            };
            if output.delay > 0 {
                let key = (
                    source.name().to_string(),
                    index,
                    target.name().to_string(),
                    instigator.name().to_string(),
                );
                let helper = self.delayed_helper(key, trigger, target, output, source, instigator)?;
                commands.push(Command::schedule(helper, output.delay, ScheduleMode::Append));
            } else {
                commands.extend(self.call_input(target, output, source, instigator)?);
            }
        }
        Ok(commands)
    }

    fn delayed_helper(
        &mut self,
        key: DelayKey,
        trigger: &str,
        target: &Entity,
        output: &Output,
        source: &Entity,
        instigator: &Entity,
    ) -> CoreResult<Identifier> {
        if let Some(id) = self.delayed.get(&key) {
            return Ok(id.clone());
        }
        let base = self.function_id(source, &format!("delay_{}", sanitize_segment(trigger)))?;
        let id = self.datapack.fresh_function_id(&base)?;
        // Registered before the body is compiled so a loop back here schedules it.
        self.datapack.add_function(Function::new(id.clone()))?;
        self.delayed.insert(key, id.clone());

        let outer = std::mem::take(&mut self.chain);
        let body = self.call_input(target, output, source, instigator);
        self.chain = outer;
        self.datapack.function_entry(&id).extend(body?);
        Ok(id)
    }

    fn call_input(
        &mut self,
        target: &Entity,
        output: &Output,
        source: &Entity,
        instigator: &Entity,
    ) -> CoreResult<Vec<Command>> {
        let key = (target.name().to_string(), output.input.clone());
        if let Some(start) = self.chain.iter().position(|k| *k == key) {
            let mut names: Vec<String> = self.chain[start..]
                .iter()
                .map(|(entity, input)| format!("{entity}.{input}"))
                .collect();
            names.push(format!("{}.{}", key.0, key.1));
            return Err(CoreError::WiringCycle(names));
        }

        self.chain.push(key);
        let call = InputCall {
            entity: target,
            input: &output.input,
            args: &output.args,
            source,
            instigator,
        };
        let result = target.kind().compile_input(&call, self);
        self.chain.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::kind::{EntityKind, PortDecl, UnknownKind};

    /// Answers every input with a `say`.
    #[derive(Debug)]
    struct Echo;

    impl EntityKind for Echo {
        fn type_name(&self) -> &str {
            "echo"
        }

        fn inputs(&self) -> Vec<PortDecl> {
            vec![PortDecl::new("ping", "say something")]
        }

        fn compile_input(
            &self,
            call: &InputCall<'_>,
            _ctx: &mut LogicContext<'_>,
        ) -> CoreResult<Vec<Command>> {
            Ok(vec![Command::raw(format!(
                "say {}.{} from {}",
                call.entity.name(),
                call.input,
                call.source.name()
            ))])
        }
    }

    /// Inlines its own outputs when poked.
    #[derive(Debug)]
    struct Forward;

    impl EntityKind for Forward {
        fn type_name(&self) -> &str {
            "forward"
        }

        fn compile_input(
            &self,
            call: &InputCall<'_>,
            ctx: &mut LogicContext<'_>,
        ) -> CoreResult<Vec<Command>> {
            ctx.compile_output(call.entity, "on_poke", call.instigator)
        }
    }

    /// Names everyone involved in the call.
    #[derive(Debug)]
    struct Report;

    impl EntityKind for Report {
        fn type_name(&self) -> &str {
            "report"
        }

        fn compile_input(
            &self,
            call: &InputCall<'_>,
            _ctx: &mut LogicContext<'_>,
        ) -> CoreResult<Vec<Command>> {
            Ok(vec![Command::raw(format!(
                "say {}.{} source={} instigator={}",
                call.entity.name(),
                call.input,
                call.source.name(),
                call.instigator.name()
            ))])
        }
    }

    fn compile(level: &Level, source: &str, trigger: &str) -> (CoreResult<Vec<Command>>, Datapack) {
        let mut pack = Datapack::new(&level.namespace());
        let init = pack.id("init").unwrap();
        let tick = pack.id("tick").unwrap();
        let result = {
            let mut ctx = LogicContext::new(level, &mut pack, init, tick);
            let entity = level.entity(source).unwrap();
            ctx.compile_output(entity, trigger, entity)
        };
        (result, pack)
    }

    fn lines(commands: &[Command]) -> Vec<String> {
        commands.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn fan_out_keeps_connection_order() {
        let mut level = Level::new("t");
        level
            .add_entity(
                Entity::new(Arc::new(Forward), "src")
                    .with_output(Output::new("on_fire", "b", "ping"))
                    .with_output(Output::new("on_other", "a", "ping"))
                    .with_output(Output::new("on_*", "a", "ping")),
            )
            .unwrap();
        level.add_entity(Entity::new(Arc::new(Echo), "a")).unwrap();
        level.add_entity(Entity::new(Arc::new(Echo), "b")).unwrap();

        let (result, _) = compile(&level, "src", "on_fire");
        assert_eq!(
            lines(&result.unwrap()),
            vec!["say b.ping from src", "say a.ping from src"]
        );
    }

    #[test]
    fn missing_target_is_skipped() {
        let mut level = Level::new("t");
        level
            .add_entity(
                Entity::new(Arc::new(Forward), "src")
                    .with_output(Output::new("on_fire", "ghost", "ping"))
                    .with_output(Output::new("on_fire", "!self", "poke")),
            )
            .unwrap();
        let (result, _) = compile(&level, "src", "on_fire");
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn delayed_connection_is_scheduled() {
        let mut level = Level::new("t");
        level
            .add_entity(
                Entity::new(Arc::new(Forward), "src")
                    .with_output(Output::new("on_fire", "a", "ping").with_delay(20))
                    .with_output(Output::new("on_fire", "a", "ping").with_delay(5)),
            )
            .unwrap();
        level.add_entity(Entity::new(Arc::new(Echo), "a")).unwrap();

        let (result, pack) = compile(&level, "src", "on_fire");
        assert_eq!(
            lines(&result.unwrap()),
            vec![
                "schedule function t:src/delay_on_fire 20t append",
                "schedule function t:src/delay_on_fire_2 5t append",
            ]
        );
        let helper = pack.function(&"t:src/delay_on_fire".parse().unwrap()).unwrap();
        assert_eq!(helper.render(), "say a.ping from src\n");
    }

    #[test]
    fn reentrant_chain_is_a_cycle() {
        let mut level = Level::new("t");
        level
            .add_entity(
                Entity::new(Arc::new(Forward), "f1").with_output(Output::new("on_poke", "f2", "poke")),
            )
            .unwrap();
        level
            .add_entity(
                Entity::new(Arc::new(Forward), "f2").with_output(Output::new("on_poke", "f1", "poke")),
            )
            .unwrap();

        let (result, _) = compile(&level, "f1", "on_poke");
        match result {
            Err(CoreError::WiringCycle(chain)) => {
                assert_eq!(chain, vec!["f2.poke", "f1.poke", "f2.poke"]);
            }
            other => panic!("expected a wiring cycle, got {other:?}"),
        }
    }

    #[test]
    fn undeclared_input_errors() {
        let mut level = Level::new("t");
        level
            .add_entity(
                Entity::new(Arc::new(Forward), "src").with_output(Output::new("on_fire", "a", "ping")),
            )
            .unwrap();
        level
            .add_entity(Entity::new(Arc::new(UnknownKind::new("stone")), "a"))
            .unwrap();
        let (result, _) = compile(&level, "src", "on_fire");
        assert!(matches!(result, Err(CoreError::UnknownInput { .. })));
    }

    #[test]
    fn identifiers_follow_entity_names() {
        let mut level = Level::new("My Map");
        level.add_entity(Entity::new(Arc::new(Echo), "Main Door")).unwrap();
        let mut pack = Datapack::new(&level.namespace());
        let init = pack.id("init").unwrap();
        let tick = pack.id("tick").unwrap();
        let ctx = LogicContext::new(&level, &mut pack, init, tick);
        let door = level.entity("Main Door").unwrap();
        assert_eq!(ctx.storage_id(door).unwrap().to_string(), "mymap:maindoor");
        assert_eq!(ctx.function_id(door, "open").unwrap().to_string(), "mymap:maindoor/open");
    }

    #[test]
    fn instigator_survives_forwarding() {
        let mut level = Level::new("t");
        level
            .add_entity(
                Entity::new(Arc::new(Report), "button")
                    .with_output(Output::new("on_press", "relay", "poke"))
                    .with_output(Output::new("on_press", "!self", "report")),
            )
            .unwrap();
        level
            .add_entity(
                Entity::new(Arc::new(Forward), "relay")
                    .with_output(Output::new("on_poke", "!instigator", "report"))
                    .with_output(Output::new("on_poke", "lamp", "report")),
            )
            .unwrap();
        level.add_entity(Entity::new(Arc::new(Report), "lamp")).unwrap();

        let (result, _) = compile(&level, "button", "on_press");
        assert_eq!(
            lines(&result.unwrap()),
            vec![
                "say button.report source=relay instigator=button",
                "say lamp.report source=relay instigator=button",
                "say button.report source=button instigator=button",
            ]
        );
    }

    #[test]
    fn delayed_self_loop_schedules_its_own_helper() {
        let mut level = Level::new("t");
        level
            .add_entity(
                Entity::new(Arc::new(Echo), "start").with_output(Output::new("on_fire", "f", "poke")),
            )
            .unwrap();
        level
            .add_entity(
                Entity::new(Arc::new(Forward), "f")
                    .with_output(Output::new("on_poke", "!self", "poke").with_delay(20)),
            )
            .unwrap();

        let (result, pack) = compile(&level, "start", "on_fire");
        let schedule = "schedule function t:f/delay_on_poke 20t append";
        assert_eq!(lines(&result.unwrap()), vec![schedule]);
        let helper = pack.function(&"t:f/delay_on_poke".parse().unwrap()).unwrap();
        assert_eq!(helper.render(), format!("{schedule}\n"));
        assert_eq!(pack.functions().count(), 1);
    }

    #[test]
    fn delayed_helper_is_shared_by_repeated_firings() {
        let mut level = Level::new("t");
        level
            .add_entity(
                Entity::new(Arc::new(Forward), "src")
                    .with_output(Output::new("on_*", "a", "ping").with_delay(10)),
            )
            .unwrap();
        level.add_entity(Entity::new(Arc::new(Echo), "a")).unwrap();

        let mut pack = Datapack::new("t");
        let init = pack.id("init").unwrap();
        let tick = pack.id("tick").unwrap();
        let src = level.entity("src").unwrap();
        let (first, second) = {
            let mut ctx = LogicContext::new(&level, &mut pack, init, tick);
            let first = ctx.compile_output(src, "on_fire", src).unwrap();
            (first, ctx.compile_output(src, "on_fire", src).unwrap())
        };
        assert_eq!(lines(&first), lines(&second));
        assert_eq!(pack.functions().count(), 1);
    }
}
