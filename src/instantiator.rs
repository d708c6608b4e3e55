use alloc::{boxed::Box, collections::BTreeMap, string::String};
use core::fmt::{self, Debug, Formatter};
use tracing::{debug, debug_span, error};

use crate::{
    errors::InstantiateErrorKind,
    registry::Bean,
    utils::thread_safety::{SendSafety, SyncSafety},
    wire::Wire,
};

/// Produces a fresh, unwired bean
pub trait Instantiator: Send + Sync + 'static {
    type Provides: Wire + SendSafety + SyncSafety + 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&self) -> Result<Self::Provides, Self::Error>;
}

impl<F, Provides, Err> Instantiator for F
where
    F: Fn() -> Result<Provides, Err> + Send + Sync + 'static,
    Provides: Wire + SendSafety + SyncSafety + 'static,
    Err: Into<InstantiateErrorKind>,
{
    type Provides = Provides;
    type Error = Err;

    #[inline]
    fn instantiate(&self) -> Result<Self::Provides, Self::Error> {
        self()
    }
}

type BoxedInstantiator = Box<dyn Fn() -> Result<Bean, InstantiateErrorKind> + Send + Sync>;

#[must_use]
fn boxed_instantiator<Inst: Instantiator>(instantiator: Inst) -> BoxedInstantiator {
    Box::new(move || match instantiator.instantiate() {
        Ok(value) => Ok(Bean::new(value)),
        Err(err) => Err(err.into()),
    })
}

enum TypeEntry {
    Concrete(BoxedInstantiator),
    Abstract,
}

/// Type names a configuration may refer to, each with the way to instantiate it.
///
/// Registering a name twice replaces the previous entry.
#[derive(Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeEntry>,
}

impl TypeRegistry {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { types: BTreeMap::new() }
    }

    /// Registers a type instantiated with its [`Default`] value
    #[inline]
    #[must_use]
    pub fn provide<T>(self, type_name: impl Into<String>) -> Self
    where
        T: Default + Wire + SendSafety + SyncSafety + 'static,
    {
        self.provide_with(type_name, || Ok::<_, InstantiateErrorKind>(T::default()))
    }

    /// Registers a type instantiated by a factory.
    ///
    /// A property can only hold the exact type of the bean wired into it.
    /// To let a property depend on a trait, register the implementation as a boxed trait object:
    ///
    /// ```rust
    /// use beanwire::{wire, Autowired, BeanDeclaration, Container, InstantiateErrorKind, TypeRegistry};
    ///
    /// trait FruitDao: Send + Sync {
    ///     fn count(&self) -> usize;
    /// }
    ///
    /// struct FruitDaoImpl;
    ///
    /// impl FruitDao for FruitDaoImpl {
    ///     fn count(&self) -> usize {
    ///         3
    ///     }
    /// }
    ///
    /// #[derive(Default)]
    /// struct FruitService {
    ///     fruit_dao: Autowired<Box<dyn FruitDao>>,
    /// }
    ///
    /// wire!(Box<dyn FruitDao>);
    /// wire!(FruitService { fruit_dao as "fruitDAO" });
    ///
    /// let types = TypeRegistry::new()
    ///     .provide::<FruitService>("FruitServiceImpl")
    ///     .provide_with("FruitDAOImpl", || Ok::<Box<dyn FruitDao>, InstantiateErrorKind>(Box::new(FruitDaoImpl)));
    ///
    /// let container = Container::from_reader(
    ///     &types,
    ///     vec![
    ///         BeanDeclaration::new("fruitService", "FruitServiceImpl").property("fruitDAO", "fruitDAO"),
    ///         BeanDeclaration::new("fruitDAO", "FruitDAOImpl"),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// let service = container.get::<FruitService>("fruitService").unwrap();
    /// assert_eq!(service.fruit_dao.get().unwrap().count(), 3);
    /// ```
    #[inline]
    #[must_use]
    pub fn provide_with(mut self, type_name: impl Into<String>, instantiator: impl Instantiator) -> Self {
        self.types
            .insert(type_name.into(), TypeEntry::Concrete(boxed_instantiator(instantiator)));
        self
    }

    /// Registers a name that is known but can't be instantiated, like an interface a bean is expected to implement
    #[inline]
    #[must_use]
    pub fn provide_abstract(mut self, type_name: impl Into<String>) -> Self {
        self.types.insert(type_name.into(), TypeEntry::Abstract);
        self
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Creates a new instance of the type registered under `type_name`.
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::UnknownType`] if the name isn't registered
    /// - Returns [`InstantiateErrorKind::NotInstantiable`] if the name is registered as abstract
    /// - Returns [`InstantiateErrorKind::Custom`] if the factory fails
    pub(crate) fn instantiate(&self, type_name: &str) -> Result<Bean, InstantiateErrorKind> {
        let span = debug_span!("instantiate", type_name);
        let _guard = span.enter();

        let instantiator = match self.types.get(type_name) {
            Some(TypeEntry::Concrete(instantiator)) => instantiator,
            Some(TypeEntry::Abstract) => {
                let err = InstantiateErrorKind::NotInstantiable;
                error!("{}", err);
                return Err(err);
            }
            None => {
                let err = InstantiateErrorKind::UnknownType;
                error!("{}", err);
                return Err(err);
            }
        };

        match instantiator() {
            Ok(bean) => {
                debug!(provides = bean.type_info.short_name(), "Instantiated");
                Ok(bean)
            }
            Err(err) => {
                error!("{}", err);
                Err(err)
            }
        }
    }
}

impl Debug for TypeRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.types.keys()).finish()
    }
}

/// Builds a [`TypeRegistry`] of default-constructed types.
/// Beans depended on through a trait are registered with [`TypeRegistry::provide_with`] instead.
///
/// # Examples
/// ```rust
/// use beanwire::{types, wire};
///
/// #[derive(Default)]
/// struct FruitDaoImpl;
///
/// wire!(FruitDaoImpl);
///
/// let types = types! {
///     "com.hive.fruit.dao.impl.FruitDAOImpl" => FruitDaoImpl,
/// };
/// assert!(types.contains("com.hive.fruit.dao.impl.FruitDAOImpl"));
/// ```
#[macro_export]
macro_rules! types {
    ( $( $name:literal => $ty:ty ),* $(,)? ) => {
        $crate::TypeRegistry::new() $( .provide::<$ty>($name) )*
    };
}
