//! Configuration types shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use confbind::{
    ConfigRef, FieldDescriptor, LifecycleMarker, MethodDescriptor, TypeDescriptor, config_object,
};
use lazy_static::lazy_static;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// --- Base <- Child <- GrandChild --------------------------------------------

#[derive(Default)]
pub struct Base {
    pub x: String,
}

#[derive(Default)]
pub struct Child {
    pub base: Base,
    pub y: i64,
}

#[derive(Default)]
pub struct GrandChild {
    pub child: Child,
    pub w: bool,
    pub tags: Vec<String>,
}

lazy_static! {
    static ref BASE_TYPE: Arc<TypeDescriptor> = TypeDescriptor::builder::<Base>("Base")
        .field(
            FieldDescriptor::value("x", |b: &Base| b.x.clone(), |b: &mut Base, v| b.x = v)
                .inject()
        )
        .build();
    static ref CHILD_TYPE: Arc<TypeDescriptor> = TypeDescriptor::builder::<Child>("Child")
        .extends(BASE_TYPE.clone(), |c| &c.base, |c| &mut c.base)
        .field(FieldDescriptor::value("y", |c: &Child| c.y, |c: &mut Child, v| c.y = v).inject())
        .field(FieldDescriptor::static_field::<i64>("Z").inject())
        .build();
    static ref GRAND_CHILD_TYPE: Arc<TypeDescriptor> =
        TypeDescriptor::builder::<GrandChild>("GrandChild")
            .extends(CHILD_TYPE.clone(), |g| &g.child, |g| &mut g.child)
            .field(FieldDescriptor::static_field::<String>("VERSION"))
            .field(
                FieldDescriptor::value("w", |g: &GrandChild| g.w, |g: &mut GrandChild, v| g.w = v)
                    .inject()
                    .optional()
            )
            .field(FieldDescriptor::value(
                "cache",
                |g: &GrandChild| g.w,
                |g: &mut GrandChild, v| g.w = v,
            ))
            .field(
                FieldDescriptor::value(
                    "tags",
                    |g: &GrandChild| g.tags.clone(),
                    |g: &mut GrandChild, v| g.tags = v,
                )
                .inject_as("labels")
            )
            .build();
}

pub fn base_type() -> Arc<TypeDescriptor> {
    BASE_TYPE.clone()
}

pub fn child_type() -> Arc<TypeDescriptor> {
    CHILD_TYPE.clone()
}

pub fn grand_child_type() -> Arc<TypeDescriptor> {
    GRAND_CHILD_TYPE.clone()
}

config_object!(Base, base_type);
config_object!(Child, child_type);
config_object!(GrandChild, grand_child_type);

// --- Shadowing: a subtype redeclaring a parent property name ----------------

#[derive(Default)]
pub struct Shadowing {
    pub base: Base,
    pub x: String,
}

pub fn shadowing_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder::<Shadowing>("Shadowing")
        .extends(base_type(), |s| &s.base, |s| &mut s.base)
        .field(
            FieldDescriptor::value("x", |s: &Shadowing| s.x.clone(), |s: &mut Shadowing, v| {
                s.x = v
            })
            .inject(),
        )
        .build()
}

config_object!(Shadowing, shadowing_type);

// --- Decoration -------------------------------------------------------------

pub struct Endpoint {
    pub url: String,
}

pub fn endpoint_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder::<Endpoint>("Endpoint")
        .field(
            FieldDescriptor::value("url", |e: &Endpoint| e.url.clone(), |e: &mut Endpoint, v| {
                e.url = v
            })
            .inject(),
        )
        .build()
}

config_object!(Endpoint, endpoint_type);

/// Decorates another configuration with retries.
pub struct Retrying {
    pub attempts: u32,
    pub inner: ConfigRef,
}

pub fn retrying_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder::<Retrying>("Retrying")
        .field(
            FieldDescriptor::value(
                "attempts",
                |r: &Retrying| r.attempts,
                |r: &mut Retrying, v| r.attempts = v,
            )
            .inject(),
        )
        .field(FieldDescriptor::delegate(
            "inner",
            |r: &Retrying| r.inner.clone(),
            |r: &mut Retrying, v| r.inner = v,
        ))
        .build()
}

config_object!(Retrying, retrying_type);

/// Decorator whose inner object is set after construction, so that cycles can be built.
pub struct Looping {
    pub inner: OnceLock<ConfigRef>,
}

pub fn looping_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder::<Looping>("Looping")
        .field(FieldDescriptor::delegate(
            "inner",
            |l: &Looping| l.inner.get().cloned().expect("inner not set"),
            |l: &mut Looping, v| {
                let _ = l.inner.set(v);
            },
        ))
        .build()
}

config_object!(Looping, looping_type);

/// Declares a delegate role on a plain value, which the factory rejects.
pub struct Broken {
    pub inner: String,
}

pub fn broken_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder::<Broken>("Broken")
        .field(
            FieldDescriptor::value("inner", |b: &Broken| b.inner.clone(), |b: &mut Broken, v| {
                b.inner = v
            })
            .inject()
            .role(confbind::metadata::FieldRole::Delegate),
        )
        .build()
}

config_object!(Broken, broken_type);

pub fn endpoint(url: &str) -> ConfigRef {
    Arc::new(Endpoint {
        url: url.to_string(),
    })
}

pub fn retrying(attempts: u32, inner: ConfigRef) -> ConfigRef {
    Arc::new(Retrying { attempts, inner })
}

// --- Lifecycle --------------------------------------------------------------

#[derive(Default)]
pub struct Service {
    pub started: AtomicBool,
    pub stopped: AtomicBool,
    pub inits: AtomicUsize,
}

#[derive(Default)]
pub struct ExtendedService {
    pub service: Service,
    pub extended_inits: AtomicUsize,
}

pub fn service_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder::<Service>("Service")
        .method(
            MethodDescriptor::new("init", |s: &Service| {
                s.started.store(true, Ordering::SeqCst);
                s.inits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .marked(LifecycleMarker::PostConstruct),
        )
        .method(MethodDescriptor::new("describe", |_: &Service| Ok(())))
        .method(
            MethodDescriptor::new("shutdown", |s: &Service| {
                s.stopped.store(true, Ordering::SeqCst);
                Ok(())
            })
            .marked(LifecycleMarker::PreDestroy),
        )
        .method(
            MethodDescriptor::new("warm_up", |_: &Service| Ok(()))
                .private()
                .marked(LifecycleMarker::PostConstruct),
        )
        .build()
}

pub fn extended_service_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder::<ExtendedService>("ExtendedService")
        .extends(service_type(), |e| &e.service, |e| &mut e.service)
        .method(
            MethodDescriptor::new("init", |e: &ExtendedService| {
                e.extended_inits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .marked(LifecycleMarker::PostConstruct),
        )
        .build()
}

config_object!(Service, service_type);
config_object!(ExtendedService, extended_service_type);

/// Two distinct post-construct methods.
#[derive(Default)]
pub struct TwoHooks;

pub fn two_hooks_type() -> Arc<TypeDescriptor> {
    TypeDescriptor::builder::<TwoHooks>("TwoHooks")
        .method(
            MethodDescriptor::new("open", |_: &TwoHooks| Ok(()))
                .marked(LifecycleMarker::PostConstruct),
        )
        .method(
            MethodDescriptor::new("connect", |_: &TwoHooks| Ok(()))
                .marked(LifecycleMarker::PostConstruct),
        )
        .build()
}

config_object!(TwoHooks, two_hooks_type);
