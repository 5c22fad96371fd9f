//! 依赖注入实现的并发测试

use di_abstractions::{ComponentRegistry, ComponentResolver, DiContainer};
use di_impl::DiContainerImpl;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[derive(Debug)]
struct SlowService {
    serial: usize,
}

/// 并发首次解析时所有线程拿到同一个实例
#[test]
fn test_concurrent_first_resolution_yields_one_instance() {
    const THREADS: usize = 8;

    let container = Arc::new(DiContainerImpl::new());
    let constructed = Arc::new(AtomicUsize::new(0));

    let counter = constructed.clone();
    container.register(move |_| {
        let serial = counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        Ok(SlowService { serial })
    });

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container.resolve::<SlowService>().unwrap()
            })
        })
        .collect();

    let instances: Vec<Arc<SlowService>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let first = &instances[0];
    assert!(instances.iter().all(|instance| Arc::ptr_eq(instance, first)));

    let constructed = constructed.load(Ordering::SeqCst);
    let stats = container.stats();
    assert!(constructed >= 1);
    assert_eq!(stats.discarded_instances, (constructed - 1) as u64);
    assert_eq!(stats.active_singletons, 1);
    assert!(first.serial < constructed);
}

#[derive(Debug)]
struct Left;

#[derive(Debug)]
struct Right;

/// 不同线程解析同一环路互不干扰，各自得到循环依赖错误而不是死锁
#[test]
fn test_concurrent_cycle_detection_does_not_deadlock() {
    let container = Arc::new(DiContainerImpl::new());
    container.register(|ctx| {
        ctx.resolve::<Right>()?;
        Ok(Left)
    });
    container.register(|ctx| {
        ctx.resolve::<Left>()?;
        Ok(Right)
    });

    let left = {
        let container = container.clone();
        thread::spawn(move || container.resolve::<Left>().map(|_| ()))
    };
    let right = {
        let container = container.clone();
        thread::spawn(move || container.resolve::<Right>().map(|_| ()))
    };

    let left_error = left.join().unwrap().unwrap_err();
    let right_error = right.join().unwrap().unwrap_err();

    assert_eq!(left_error.to_string(), "循环依赖检测到: Left -> Right -> Left");
    assert_eq!(right_error.to_string(), "循环依赖检测到: Right -> Left -> Right");
}

/// 工厂内部注册新组件不会死锁
#[test]
fn test_factory_may_register_during_resolution() {
    #[derive(Debug)]
    struct Plugin;
    #[derive(Debug)]
    struct Host;

    let container = Arc::new(DiContainerImpl::new());
    let registry = container.clone();
    container.register(move |_| {
        registry.register_instance(Plugin);
        Ok(Host)
    });

    container.resolve::<Host>().unwrap();
    assert!(container.is_registered::<Plugin>());
    assert!(container.resolve::<Plugin>().is_ok());
}
