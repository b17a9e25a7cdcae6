//! 处理器注册表
//!
//! 启动时按请求的 `TypeId` 登记处理器工厂与校验器，`build()` 时做一次性检查：
//! 重复处理器、声明为必需但缺少处理器的类型、没有处理器的校验器都会导致构建失败。

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use tasker_errors::{AppError, AppResult};

use crate::pipeline::{CommandTerminal, Pipeline, QueryTerminal, Terminal, TerminalFactory};
use crate::{Command, CommandHandler, Query, QueryHandler, Validator};

type ErasedPipeline = Box<dyn Any + Send + Sync>;
type Finalizer = Box<dyn FnOnce(&mut ValidatorTable) -> ErasedPipeline + Send>;

struct ValidatorSlot {
    type_name: &'static str,
    validators: Box<dyn Any + Send>,
}

#[derive(Default)]
struct ValidatorTable {
    slots: HashMap<TypeId, ValidatorSlot>,
}

impl ValidatorTable {
    fn push<R>(&mut self, validator: Arc<dyn Validator<R>>)
    where
        R: Send + Sync + 'static,
    {
        let slot = self
            .slots
            .entry(TypeId::of::<R>())
            .or_insert_with(|| ValidatorSlot {
                type_name: type_name::<R>(),
                validators: Box::new(Vec::<Arc<dyn Validator<R>>>::new()),
            });
        if let Some(list) = slot.validators.downcast_mut::<Vec<Arc<dyn Validator<R>>>>() {
            list.push(validator);
        }
    }

    fn take<R>(&mut self) -> Vec<Arc<dyn Validator<R>>>
    where
        R: Send + Sync + 'static,
    {
        self.slots
            .remove(&TypeId::of::<R>())
            .and_then(|slot| slot.validators.downcast::<Vec<Arc<dyn Validator<R>>>>().ok())
            .map(|list| *list)
            .unwrap_or_default()
    }
}

struct PendingHandler {
    result_type: &'static str,
    finalize: Finalizer,
}

struct RegisteredPipeline {
    result_type: &'static str,
    pipeline: ErasedPipeline,
}

/// 注册表构建器
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<TypeId, PendingHandler>,
    validators: ValidatorTable,
    required: Vec<(TypeId, &'static str)>,
    errors: Vec<String>,
}

impl HandlerRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册命令处理器工厂；每次分发调用一次工厂
    pub fn command_handler<C, H, F>(mut self, factory: F) -> Self
    where
        C: Command,
        H: CommandHandler<C> + 'static,
        F: Fn() -> H + Send + Sync + 'static,
    {
        let terminal: TerminalFactory<C, C::Result> =
            Arc::new(move || Box::new(CommandTerminal(factory())) as Box<dyn Terminal<C, C::Result>>);
        self.insert_handler::<C, C::Result>("command", terminal);
        self
    }

    /// 注册查询处理器工厂；每次分发调用一次工厂
    pub fn query_handler<Q, H, F>(mut self, factory: F) -> Self
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
        F: Fn() -> H + Send + Sync + 'static,
    {
        let terminal: TerminalFactory<Q, Q::Result> =
            Arc::new(move || Box::new(QueryTerminal(factory())) as Box<dyn Terminal<Q, Q::Result>>);
        self.insert_handler::<Q, Q::Result>("query", terminal);
        self
    }

    /// 为请求类型追加一个校验器
    pub fn validator<R, V>(mut self, validator: V) -> Self
    where
        R: Send + Sync + 'static,
        V: Validator<R> + 'static,
    {
        self.validators.push::<R>(Arc::new(validator));
        self
    }

    /// 声明必须存在处理器的请求类型
    pub fn require<R: 'static>(mut self) -> Self {
        self.required.push((TypeId::of::<R>(), type_name::<R>()));
        self
    }

    fn insert_handler<R, O>(&mut self, kind: &'static str, terminal: TerminalFactory<R, O>)
    where
        R: Send + Sync + 'static,
        O: Send + 'static,
    {
        let type_id = TypeId::of::<R>();
        if self.handlers.contains_key(&type_id) {
            self.errors
                .push(format!("Duplicate handler registered for {}", type_name::<R>()));
            return;
        }

        let finalize: Finalizer = Box::new(move |validators: &mut ValidatorTable| {
            let pipeline = Pipeline::new(kind, validators.take::<R>(), terminal);
            Box::new(pipeline) as ErasedPipeline
        });
        self.handlers.insert(
            type_id,
            PendingHandler {
                result_type: type_name::<O>(),
                finalize,
            },
        );
    }

    /// 构建注册表，任何配置错误都会导致失败
    pub fn build(self) -> AppResult<HandlerRegistry> {
        let Self {
            handlers,
            mut validators,
            required,
            mut errors,
        } = self;

        for (type_id, name) in &required {
            if !handlers.contains_key(type_id) {
                errors.push(format!("No handler registered for required request {}", name));
            }
        }

        let mut pipelines = HashMap::with_capacity(handlers.len());
        for (type_id, pending) in handlers {
            let pipeline = (pending.finalize)(&mut validators);
            pipelines.insert(
                type_id,
                RegisteredPipeline {
                    result_type: pending.result_type,
                    pipeline,
                },
            );
        }

        for slot in validators.slots.values() {
            errors.push(format!(
                "Validator registered for {} which has no handler",
                slot.type_name
            ));
        }

        if !errors.is_empty() {
            errors.sort();
            let message = errors.join("; ");
            tracing::error!(errors = %message, "Handler registry configuration is invalid");
            return Err(AppError::configuration(message));
        }

        tracing::info!(handlers = pipelines.len(), "Handler registry built");
        Ok(HandlerRegistry { pipelines })
    }
}

/// 处理器注册表（构建后只读）
pub struct HandlerRegistry {
    pipelines: HashMap<TypeId, RegisteredPipeline>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    pub fn contains<R: 'static>(&self) -> bool {
        self.pipelines.contains_key(&TypeId::of::<R>())
    }

    pub(crate) fn pipeline<R, O>(&self) -> AppResult<&Pipeline<R, O>>
    where
        R: 'static,
        O: 'static,
    {
        let name = type_name::<R>();
        let Some(entry) = self.pipelines.get(&TypeId::of::<R>()) else {
            tracing::error!(request = name, "No handler registered for request");
            return Err(AppError::configuration(format!(
                "No handler registered for {}",
                name
            )));
        };

        entry.pipeline.downcast_ref::<Pipeline<R, O>>().ok_or_else(|| {
            tracing::error!(
                request = name,
                registered = entry.result_type,
                expected = type_name::<O>(),
                "Handler registered with a different result type"
            );
            AppError::configuration(format!(
                "Handler for {} returns {}, not {}",
                name,
                entry.result_type,
                type_name::<O>()
            ))
        })
    }
}
