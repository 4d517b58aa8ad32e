// ============================================================================
// MAPS LOADER - Carga única del script de Google Maps
// ============================================================================
// Servicio con dependencias inyectadas (ScriptHost + Scheduler).
// Señal de disponibilidad: subscribe() o el future ready().
// Instancia global explícita: init_maps_loader / teardown_maps_loader.
// ============================================================================

use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

use futures::channel::oneshot;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::maps::{MapError, Scheduler, ScriptHost, TimerId};
use crate::state::ScriptStatus;
use crate::utils::constants::{MAPS_CALLBACK_PREFIX, MAPS_SCRIPT_BASE_URL};

type Waiter = Box<dyn FnOnce(Result<(), MapError>)>;

#[derive(Debug, Clone)]
pub struct LoaderSettings {
    pub api_key: String,
    pub poll_interval_ms: u32,
    /// Tiempo máximo esperando a un tag de carga ajeno
    pub timeout_ms: u32,
}

impl LoaderSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.google_maps_api_key.clone(),
            poll_interval_ms: config.loader_config.script_poll_interval_ms.max(1),
            timeout_ms: config.loader_config.script_timeout_ms,
        }
    }
}

struct LoaderInner {
    status: ScriptStatus,
    callback_name: Option<String>,
    poll_timer: Option<TimerId>,
    waited_ms: u32,
    waiters: Vec<Waiter>,
}

struct LoaderShared {
    host: Rc<dyn ScriptHost>,
    scheduler: Rc<dyn Scheduler>,
    settings: LoaderSettings,
    inner: RefCell<LoaderInner>,
}

/// Cargador del script de mapas (clonable, estado compartido)
#[derive(Clone)]
pub struct MapsLoader {
    shared: Rc<LoaderShared>,
}

impl MapsLoader {
    pub fn new(host: Rc<dyn ScriptHost>, scheduler: Rc<dyn Scheduler>, settings: LoaderSettings) -> Self {
        Self {
            shared: Rc::new(LoaderShared {
                host,
                scheduler,
                settings,
                inner: RefCell::new(LoaderInner {
                    status: ScriptStatus::NotStarted,
                    callback_name: None,
                    poll_timer: None,
                    waited_ms: 0,
                    waiters: Vec::new(),
                }),
            }),
        }
    }

    fn downgrade(&self) -> Weak<LoaderShared> {
        Rc::downgrade(&self.shared)
    }

    fn upgrade(weak: &Weak<LoaderShared>) -> Option<MapsLoader> {
        weak.upgrade().map(|shared| MapsLoader { shared })
    }

    pub fn status(&self) -> ScriptStatus {
        self.shared.inner.borrow().status.clone()
    }

    /// Nombre del callback global pendiente (solo mientras se inyecta)
    pub fn pending_callback(&self) -> Option<String> {
        self.shared.inner.borrow().callback_name.clone()
    }

    /// Iniciar la carga si todavía no empezó (idempotente)
    pub fn ensure_loaded(&self) {
        if self.status() != ScriptStatus::NotStarted {
            return;
        }

        let host = self.shared.host.clone();

        if host.namespace_ready() {
            log::info!("🗺️ [LOADER] Google Maps API ya disponible");
            self.finish(Ok(()));
            return;
        }

        self.shared.inner.borrow_mut().status = ScriptStatus::Loading;

        if host.loader_tag_present() {
            log::info!("⏳ [LOADER] Script ya presente, esperando a que cargue...");
            self.shared.inner.borrow_mut().waited_ms = 0;
            self.schedule_poll();
            return;
        }

        self.inject();
    }

    fn inject(&self) {
        let callback_name = format!("{}{}", MAPS_CALLBACK_PREFIX, Uuid::new_v4().simple());
        let src = script_url(&self.shared.settings.api_key, &callback_name);
        log::info!("📥 [LOADER] Cargando script de Google Maps (callback {})", callback_name);

        let on_load: Box<dyn FnOnce()> = {
            let weak = self.downgrade();
            let name = callback_name.clone();
            Box::new(move || {
                if let Some(loader) = Self::upgrade(&weak) {
                    log::info!("✅ [LOADER] Google Maps API cargada");
                    loader.release(&name);
                    loader.finish(Ok(()));
                }
            })
        };

        let on_error: Box<dyn FnOnce(String)> = {
            let weak = self.downgrade();
            let name = callback_name.clone();
            Box::new(move |message: String| {
                if let Some(loader) = Self::upgrade(&weak) {
                    log::error!("❌ [LOADER] Error cargando Google Maps API: {}", message);
                    loader.release(&name);
                    loader.finish(Err(MapError::ScriptLoad(message)));
                }
            })
        };

        self.shared.inner.borrow_mut().callback_name = Some(callback_name.clone());

        let injected = self
            .shared
            .host
            .inject_loader(&src, &callback_name, on_load, on_error);
        if let Err(e) = injected {
            log::error!("❌ [LOADER] No se pudo inyectar el script: {}", e);
            self.release(&callback_name);
            self.finish(Err(e));
        }
    }

    fn release(&self, callback_name: &str) {
        self.shared.host.release_callback(callback_name);
        let mut inner = self.shared.inner.borrow_mut();
        if inner.callback_name.as_deref() == Some(callback_name) {
            inner.callback_name = None;
        }
    }

    fn schedule_poll(&self) {
        let weak = self.downgrade();
        let id = self.shared.scheduler.schedule(
            self.shared.settings.poll_interval_ms,
            Box::new(move || {
                if let Some(loader) = Self::upgrade(&weak) {
                    loader.poll_tick();
                }
            }),
        );
        self.shared.inner.borrow_mut().poll_timer = Some(id);
    }

    fn poll_tick(&self) {
        let waited_ms = {
            let mut inner = self.shared.inner.borrow_mut();
            inner.poll_timer = None;
            if inner.status != ScriptStatus::Loading {
                return;
            }
            inner.waited_ms += self.shared.settings.poll_interval_ms;
            inner.waited_ms
        };

        if self.shared.host.namespace_ready() {
            log::info!("✅ [LOADER] Google Maps API lista tras {} ms", waited_ms);
            self.finish(Ok(()));
        } else if waited_ms >= self.shared.settings.timeout_ms {
            log::error!("❌ [LOADER] Google Maps API no apareció tras {} ms", waited_ms);
            self.finish(Err(MapError::ScriptTimeout { waited_ms }));
        } else {
            self.schedule_poll();
        }
    }

    fn finish(&self, result: Result<(), MapError>) {
        let (timer, waiters) = {
            let mut inner = self.shared.inner.borrow_mut();
            inner.status = match &result {
                Ok(()) => ScriptStatus::Ready,
                Err(e) => ScriptStatus::Failed(e.clone()),
            };
            (inner.poll_timer.take(), std::mem::take(&mut inner.waiters))
        };

        if let Some(id) = timer {
            self.shared.scheduler.cancel(id);
        }
        for waiter in waiters {
            waiter(result.clone());
        }
    }

    /// Registrar un callback que se ejecuta una vez al llegar a Ready o Failed
    pub fn subscribe<F>(&self, waiter: F)
    where
        F: FnOnce(Result<(), MapError>) + 'static,
    {
        match self.status() {
            ScriptStatus::Ready => waiter(Ok(())),
            ScriptStatus::Failed(e) => waiter(Err(e)),
            _ => self.shared.inner.borrow_mut().waiters.push(Box::new(waiter)),
        }
    }

    /// Future que resuelve cuando el script está listo (o falla)
    pub fn ready(&self) -> impl Future<Output = Result<(), MapError>> {
        let (tx, rx) = oneshot::channel();
        self.subscribe(move |result| {
            let _ = tx.send(result);
        });
        self.ensure_loaded();
        async move { rx.await.unwrap_or(Err(MapError::LoaderGone)) }
    }

    /// Reintento manual tras un fallo (sin recargar la página)
    pub fn retry(&self) {
        let previous = self.status();
        if let ScriptStatus::Failed(error) = previous {
            log::info!("🔄 [LOADER] Reintentando carga tras error: {}", error);
            if matches!(error, MapError::ScriptLoad(_)) {
                self.shared.host.remove_loader_tag();
            }
            let mut inner = self.shared.inner.borrow_mut();
            inner.status = ScriptStatus::NotStarted;
            inner.waited_ms = 0;
        }
        self.ensure_loaded();
    }

    /// Cancelar sondeos y liberar el callback global pendiente
    pub fn teardown(&self) {
        let (timer, callback_name, waiters) = {
            let mut inner = self.shared.inner.borrow_mut();
            if inner.status == ScriptStatus::Loading {
                inner.status = ScriptStatus::NotStarted;
            }
            (
                inner.poll_timer.take(),
                inner.callback_name.take(),
                std::mem::take(&mut inner.waiters),
            )
        };

        if let Some(id) = timer {
            self.shared.scheduler.cancel(id);
        }
        if let Some(name) = callback_name {
            self.shared.host.release_callback(&name);
        }
        if !waiters.is_empty() {
            log::info!("🔌 [LOADER] Teardown con {} suscriptores pendientes", waiters.len());
        }
    }
}

/// URL del script con la API key y el callback de carga
pub fn script_url(api_key: &str, callback_name: &str) -> String {
    format!(
        "{}?key={}&callback={}&libraries=places",
        MAPS_SCRIPT_BASE_URL, api_key, callback_name
    )
}

// Instancia global del loader (una por sesión de página)
thread_local! {
    static MAPS_LOADER: RefCell<Option<MapsLoader>> = RefCell::new(None);
}

/// Registrar el loader global; si ya existe se conserva el existente
pub fn init_maps_loader(loader: MapsLoader) -> MapsLoader {
    MAPS_LOADER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if let Some(existing) = slot.as_ref() {
            log::warn!("⚠️ [LOADER] init_maps_loader llamado dos veces, se conserva el existente");
            return existing.clone();
        }
        *slot = Some(loader.clone());
        loader
    })
}

pub fn maps_loader() -> Option<MapsLoader> {
    MAPS_LOADER.with(|cell| cell.borrow().clone())
}

pub fn teardown_maps_loader() {
    let loader = MAPS_LOADER.with(|cell| cell.borrow_mut().take());
    if let Some(loader) = loader {
        loader.teardown();
        log::info!("🔌 [LOADER] Loader global eliminado");
    }
}
