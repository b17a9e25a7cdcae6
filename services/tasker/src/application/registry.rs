//! 处理器注册表组装
//!
//! 组合根：登记全部命令/查询处理器与校验器，并声明必须存在处理器的请求类型；
//! 任何遗漏都会让 `build()` 失败，服务无法启动。

use std::sync::Arc;

use tasker_auth_core::TokenService;
use tasker_cqrs_core::{Dispatcher, HandlerRegistry};
use tasker_errors::AppResult;
use tasker_ports::{AuditSink, PushChannel};

use super::commands::{
    CreateTaskItemCommand, DeleteTaskItemCommand, LoginCommand, LogoutCommand,
    RefreshTokenCommand, RegisterCommand, UpdateTaskItemCommand,
};
use super::handlers::{
    CreateTaskItemHandler, DeleteTaskItemHandler, GetTaskItemByIdHandler, GetTaskItemStatsHandler,
    GetTaskItemsPagedHandler, LoginHandler, LogoutHandler, RefreshTokenHandler, RegisterHandler,
    UpdateTaskItemHandler,
};
use super::listeners::high_priority_relay;
use super::queries::{GetTaskItemByIdQuery, GetTaskItemStatsQuery, GetTaskItemsPagedQuery};
use super::validators::{
    CreateTaskItemCommandValidator, GetTaskItemsPagedQueryValidator, LoginCommandValidator,
    LogoutCommandValidator, RefreshTokenCommandValidator, RegisterCommandValidator,
    UpdateTaskItemCommandValidator,
};
use crate::domain::UnitOfWorkFactory;

/// 处理器依赖
#[derive(Clone)]
pub struct ServiceDeps {
    pub uow_factory: Arc<dyn UnitOfWorkFactory>,
    pub token_service: Arc<TokenService>,
    pub audit: Arc<dyn AuditSink>,
    pub push: Arc<dyn PushChannel>,
}

/// 构建处理器注册表
pub fn build_registry(deps: ServiceDeps) -> AppResult<HandlerRegistry> {
    let ServiceDeps {
        uow_factory,
        token_service,
        audit,
        push,
    } = deps;
    let relay = Arc::new(high_priority_relay(audit, push.clone()));

    let builder = HandlerRegistry::builder()
        // ============ Auth ============
        .command_handler::<RegisterCommand, _, _>({
            let (uow, tokens) = (uow_factory.clone(), token_service.clone());
            move || RegisterHandler::new(uow.clone(), tokens.clone())
        })
        .command_handler::<LoginCommand, _, _>({
            let (uow, tokens) = (uow_factory.clone(), token_service.clone());
            move || LoginHandler::new(uow.clone(), tokens.clone())
        })
        .command_handler::<RefreshTokenCommand, _, _>({
            let (uow, tokens) = (uow_factory.clone(), token_service.clone());
            move || RefreshTokenHandler::new(uow.clone(), tokens.clone())
        })
        .command_handler::<LogoutCommand, _, _>({
            let (uow, tokens) = (uow_factory.clone(), token_service.clone());
            move || LogoutHandler::new(uow.clone(), tokens.clone())
        })
        // ============ Task commands ============
        .command_handler::<CreateTaskItemCommand, _, _>({
            let (uow, push, relay) = (uow_factory.clone(), push.clone(), relay.clone());
            move || CreateTaskItemHandler::new(uow.clone(), push.clone(), relay.clone())
        })
        .command_handler::<UpdateTaskItemCommand, _, _>({
            let (uow, push, relay) = (uow_factory.clone(), push.clone(), relay.clone());
            move || UpdateTaskItemHandler::new(uow.clone(), push.clone(), relay.clone())
        })
        .command_handler::<DeleteTaskItemCommand, _, _>({
            let (uow, push) = (uow_factory.clone(), push.clone());
            move || DeleteTaskItemHandler::new(uow.clone(), push.clone())
        })
        // ============ Task queries ============
        .query_handler::<GetTaskItemByIdQuery, _, _>({
            let uow = uow_factory.clone();
            move || GetTaskItemByIdHandler::new(uow.clone())
        })
        .query_handler::<GetTaskItemsPagedQuery, _, _>({
            let uow = uow_factory.clone();
            move || GetTaskItemsPagedHandler::new(uow.clone())
        })
        .query_handler::<GetTaskItemStatsQuery, _, _>({
            let uow = uow_factory;
            move || GetTaskItemStatsHandler::new(uow.clone())
        })
        // ============ Validators ============
        .validator::<RegisterCommand, _>(RegisterCommandValidator)
        .validator::<LoginCommand, _>(LoginCommandValidator)
        .validator::<RefreshTokenCommand, _>(RefreshTokenCommandValidator)
        .validator::<LogoutCommand, _>(LogoutCommandValidator)
        .validator::<CreateTaskItemCommand, _>(CreateTaskItemCommandValidator)
        .validator::<UpdateTaskItemCommand, _>(UpdateTaskItemCommandValidator)
        .validator::<GetTaskItemsPagedQuery, _>(GetTaskItemsPagedQueryValidator);

    require_all(builder).build()
}

/// 声明全部请求类型为必需
fn require_all(
    builder: tasker_cqrs_core::HandlerRegistryBuilder,
) -> tasker_cqrs_core::HandlerRegistryBuilder {
    builder
        .require::<RegisterCommand>()
        .require::<LoginCommand>()
        .require::<RefreshTokenCommand>()
        .require::<LogoutCommand>()
        .require::<CreateTaskItemCommand>()
        .require::<UpdateTaskItemCommand>()
        .require::<DeleteTaskItemCommand>()
        .require::<GetTaskItemByIdQuery>()
        .require::<GetTaskItemsPagedQuery>()
        .require::<GetTaskItemStatsQuery>()
}

/// 构建分发器
pub fn build_dispatcher(deps: ServiceDeps) -> AppResult<Dispatcher> {
    Ok(Dispatcher::new(build_registry(deps)?))
}
