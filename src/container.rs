use alloc::{string::String, vec::Vec};
use core::fmt::{self, Debug, Formatter};
use tracing::{debug, debug_span, error, info, info_span};

use crate::{
    any::TypeInfo,
    declaration::{self, BeanDeclaration, PropertyRef},
    errors::{BuildErrorKind, ResolveErrorKind},
    instantiator::TypeRegistry,
    reader::DeclarationReader,
    registry::{Bean, BeanRegistry},
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
    wire::{unwire, wire},
};

#[cfg(feature = "std")]
use crate::{config::Config, reader::Resource};

/// Lookup contract of a built container
pub trait BeanFactory {
    /// Gets the shared instance of a bean
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::UnknownBeanId`] if no bean has this id
    fn get_bean(&self, id: &str) -> Result<RcAnyThreadSafety, ResolveErrorKind>;
}

/// Container of beans built from declarations.
///
/// Building instantiates every declared bean first and wires references after that,
/// so a bean may refer to beans declared later or to beans referring back to it.
/// A build either yields a container with every bean wired or fails as a whole.
///
/// Clones share the same beans.
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: RcThreadSafety<ContainerInner>,
}

impl Container {
    /// Builds container from the [`crate::reader::DEFAULT_RESOURCE`] found in the current directory.
    ///
    /// # Errors
    /// See [`Self::from_reader`]
    #[cfg(feature = "std")]
    #[inline]
    pub fn new(types: &TypeRegistry) -> Result<Self, BuildErrorKind> {
        Self::from_reader(types, Resource::default())
    }

    /// Builds container from a configuration file found in the current directory.
    ///
    /// # Errors
    /// See [`Self::from_reader`]
    #[cfg(feature = "std")]
    #[inline]
    pub fn from_resource(types: &TypeRegistry, path: impl Into<String>) -> Result<Self, BuildErrorKind> {
        Self::from_reader(types, Resource::new(path))
    }

    /// Builds container from a configuration file found in the roots of `config`.
    ///
    /// # Errors
    /// See [`Self::from_reader`]
    #[cfg(feature = "std")]
    #[inline]
    pub fn from_resource_with_config(types: &TypeRegistry, path: impl Into<String>, config: Config) -> Result<Self, BuildErrorKind> {
        Self::from_reader(types, Resource::with_config(path, config))
    }

    /// Builds container from the declarations of `reader`, instantiating their types with `types`.
    ///
    /// # Errors
    /// - Returns [`BuildErrorKind::ConfigurationLoad`] if the declarations can't be read or are invalid
    /// - Returns [`BuildErrorKind::DuplicateBeanId`] if two declarations share an id
    /// - Returns [`BuildErrorKind::TypeResolution`] if a type can't be instantiated
    /// - Returns [`BuildErrorKind::UnknownBeanId`] if a property refers to an undeclared bean
    /// - Returns [`BuildErrorKind::PropertyResolution`] if a property has no slot or the slot can't hold the referenced bean
    pub fn from_reader(types: &TypeRegistry, reader: impl DeclarationReader) -> Result<Self, BuildErrorKind> {
        let span = info_span!("build");
        let _guard = span.enter();

        let registry = Build::new(types).run(reader)?;
        info!(beans = registry.len(), "Container built");

        Ok(Self {
            inner: RcThreadSafety::new(ContainerInner { registry }),
        })
    }

    /// Gets the shared instance of a bean.
    /// Every call returns the same instance, wired with the same dependencies.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::UnknownBeanId`] if no bean has this id
    pub fn get_bean(&self, id: &str) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        let span = debug_span!("get_bean", id);
        let _guard = span.enter();

        self.inner.registry.get(id).map(|bean| bean.instance.clone())
    }

    /// Gets the shared instance of a bean as its concrete type.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::UnknownBeanId`] if no bean has this id
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the bean isn't a `Dep`
    pub fn get<Dep: SendSafety + SyncSafety + 'static>(&self, id: &str) -> Result<RcThreadSafety<Dep>, ResolveErrorKind> {
        let span = debug_span!("get", id, dependency = TypeInfo::of::<Dep>().short_name());
        let _guard = span.enter();

        let bean = self.inner.registry.get(id)?;
        match bean.instance.clone().downcast::<Dep>() {
            Ok(dependency) => Ok(dependency),
            Err(_) => {
                let err = ResolveErrorKind::IncorrectType {
                    id: id.into(),
                    expected: TypeInfo::of::<Dep>(),
                    actual: bean.type_info,
                };
                error!("{}", err);
                Err(err)
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn contains_bean(&self, id: &str) -> bool {
        self.inner.registry.contains(id)
    }

    /// Ids of all beans, sorted
    #[inline]
    pub fn bean_ids(&self) -> impl Iterator<Item = &str> {
        self.inner.registry.ids()
    }

    /// Clears every wired property of every bean, releasing reference cycles between them.
    /// Beans stay retrievable, but their [`crate::Autowired`] properties are empty afterwards.
    ///
    /// # Warning
    /// Affects all clones of the container and every bean already handed out.
    /// Dropping the container doesn't close it: beans keep their dependencies,
    /// and beans referring to each other stay alive until this method is called.
    pub fn close(&self) {
        self.inner.close();
    }
}

impl BeanFactory for Container {
    #[inline]
    fn get_bean(&self, id: &str) -> Result<RcAnyThreadSafety, ResolveErrorKind> {
        Container::get_bean(self, id)
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container").field("beans", &self.inner.registry.len()).finish()
    }
}

pub(crate) struct ContainerInner {
    registry: BeanRegistry,
}

impl ContainerInner {
    fn close(&self) {
        self.registry.beans().for_each(unwire);
        debug!("Container closed");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Uninitialized,
    Instantiation,
    Wiring,
    Ready,
    Failed,
}

struct Build<'a> {
    types: &'a TypeRegistry,
    registry: BeanRegistry,
    /// Instantiated beans in declaration order
    beans: Vec<Bean>,
    phase: Phase,
}

impl<'a> Build<'a> {
    #[inline]
    #[must_use]
    const fn new(types: &'a TypeRegistry) -> Self {
        Self {
            types,
            registry: BeanRegistry::new(),
            beans: Vec::new(),
            phase: Phase::Uninitialized,
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "Phase changed");
        self.phase = phase;
    }

    fn run(mut self, reader: impl DeclarationReader) -> Result<BeanRegistry, BuildErrorKind> {
        match self.try_run(reader) {
            Ok(()) => {
                self.enter(Phase::Ready);
                Ok(self.registry)
            }
            Err(err) => {
                self.enter(Phase::Failed);
                // Partially wired beans may hold each other
                self.beans.iter().for_each(unwire);
                error!("{}", err);
                Err(err)
            }
        }
    }

    fn try_run(&mut self, reader: impl DeclarationReader) -> Result<(), BuildErrorKind> {
        let declarations = reader.read()?;
        declaration::validate(&declarations)?;

        self.enter(Phase::Instantiation);
        self.instantiate_all(&declarations)?;

        self.enter(Phase::Wiring);
        self.wire_all(&declarations)
    }

    fn instantiate_all(&mut self, declarations: &[BeanDeclaration]) -> Result<(), BuildErrorKind> {
        self.beans.reserve(declarations.len());

        for BeanDeclaration { id, type_name, .. } in declarations {
            let span = debug_span!("bean", id = id.as_str());
            let _guard = span.enter();

            let bean = self.types.instantiate(type_name).map_err(|source| BuildErrorKind::TypeResolution {
                id: id.clone(),
                type_name: type_name.clone(),
                source,
            })?;
            self.registry.put(id, bean.clone())?;
            self.beans.push(bean);
        }
        Ok(())
    }

    fn wire_all(&self, declarations: &[BeanDeclaration]) -> Result<(), BuildErrorKind> {
        for (owner, BeanDeclaration { id, properties, .. }) in self.beans.iter().zip(declarations) {
            let span = debug_span!("bean", id = id.as_str());
            let _guard = span.enter();

            for PropertyRef { name, ref_id } in properties {
                let Ok(value) = self.registry.get(ref_id) else {
                    return Err(BuildErrorKind::UnknownBeanId {
                        id: ref_id.clone(),
                        owner: id.clone(),
                        property: name.clone(),
                    });
                };

                wire(owner, name, value).map_err(|source| BuildErrorKind::PropertyResolution {
                    id: id.clone(),
                    property: name.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{BeanFactory, Container};
    use crate::{
        declaration::BeanDeclaration,
        errors::{BuildErrorKind, InstantiateErrorKind, LoadErrorKind, ResolveErrorKind, WireErrorKind},
        types,
        utils::thread_safety::RcThreadSafety,
        wire, Autowired, TypeRegistry,
    };

    use alloc::{
        boxed::Box,
        format,
        string::{String, ToString as _},
        vec,
        vec::Vec,
    };
    use core::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    #[derive(Default)]
    struct FruitDao;

    #[derive(Default)]
    struct FruitService {
        fruit_dao: Autowired<FruitDao>,
    }

    #[derive(Default)]
    struct FruitController {
        fruit_service: Autowired<FruitService>,
    }

    wire!(FruitDao);
    wire!(FruitService { fruit_dao as "fruitDAO" });
    wire!(FruitController {
        fruit_service as "fruitService"
    });

    #[derive(Default)]
    struct Ping {
        pong: Autowired<Pong>,
    }

    #[derive(Default)]
    struct Pong {
        ping: Autowired<Ping>,
    }

    #[derive(Default)]
    struct Node {
        next: Autowired<Node>,
    }

    wire!(Ping { pong });
    wire!(Pong { ping });
    wire!(Node { next });

    fn types() -> TypeRegistry {
        let types = types! {
            "FruitDAOImpl" => FruitDao,
            "FruitServiceImpl" => FruitService,
            "FruitController" => FruitController,
            "Ping" => Ping,
            "Pong" => Pong,
            "Node" => Node,
        };
        types.provide_abstract("FruitDAO")
    }

    fn fruit_declarations() -> Vec<BeanDeclaration> {
        vec![
            BeanDeclaration::new("fruit", "FruitController").property("fruitService", "fruitService"),
            BeanDeclaration::new("fruitService", "FruitServiceImpl").property("fruitDAO", "fruitDAO"),
            BeanDeclaration::new("fruitDAO", "FruitDAOImpl"),
        ]
    }

    #[test]
    #[traced_test]
    fn test_forward_references() {
        let container = Container::from_reader(&types(), fruit_declarations()).unwrap();

        let controller = container.get::<FruitController>("fruit").unwrap();
        let service = container.get::<FruitService>("fruitService").unwrap();
        let dao = container.get::<FruitDao>("fruitDAO").unwrap();

        assert!(RcThreadSafety::ptr_eq(&controller.fruit_service.get().unwrap(), &service));
        assert!(RcThreadSafety::ptr_eq(&service.fruit_dao.get().unwrap(), &dao));
        assert_eq!(container.bean_ids().collect::<Vec<_>>(), ["fruit", "fruitDAO", "fruitService"]);
        assert!(logs_contain("Container built"));
    }

    #[test]
    #[traced_test]
    fn test_get_bean_shares_instance() {
        let container = Container::from_reader(&types(), fruit_declarations()).unwrap();

        let first = container.get_bean("fruitDAO").unwrap();
        let second = BeanFactory::get_bean(&container, "fruitDAO").unwrap();
        assert!(RcThreadSafety::ptr_eq(&first, &second));
        assert!(first.downcast::<FruitDao>().is_ok());
    }

    #[test]
    #[traced_test]
    fn test_circular_references() {
        let container = Container::from_reader(
            &types(),
            vec![
                BeanDeclaration::new("A", "Ping").property("pong", "B"),
                BeanDeclaration::new("B", "Pong").property("ping", "A"),
            ],
        )
        .unwrap();

        let a = container.get::<Ping>("A").unwrap();
        let b = container.get::<Pong>("B").unwrap();
        assert!(RcThreadSafety::ptr_eq(&a.pong.get().unwrap(), &b));
        assert!(RcThreadSafety::ptr_eq(&b.ping.get().unwrap(), &a));
    }

    #[test]
    #[traced_test]
    fn test_self_reference() {
        let container = Container::from_reader(&types(), vec![BeanDeclaration::new("loop", "Node").property("next", "loop")]).unwrap();

        let node = container.get::<Node>("loop").unwrap();
        assert!(RcThreadSafety::ptr_eq(&node.next.get().unwrap(), &node));
    }

    #[test]
    #[traced_test]
    fn test_permuted_declarations() {
        let mut declarations = fruit_declarations();
        declarations.reverse();

        let container = Container::from_reader(&types(), declarations).unwrap();

        let controller = container.get::<FruitController>("fruit").unwrap();
        let dao = container.get::<FruitDao>("fruitDAO").unwrap();
        let service = controller.fruit_service.get().unwrap();
        assert!(RcThreadSafety::ptr_eq(&service.fruit_dao.get().unwrap(), &dao));
    }

    #[derive(Default)]
    struct Link {
        left: Autowired<Link>,
        right: Autowired<Link>,
    }

    wire!(Link { left, right });

    /// `(owner, property, target)` triples, resolving wired instances back to their ids
    fn link_structure(container: &Container) -> Vec<(String, &'static str, String)> {
        let links: Vec<_> = container
            .bean_ids()
            .map(|id| (id.to_string(), container.get::<Link>(id).unwrap()))
            .collect();
        let id_of = |target: &RcThreadSafety<Link>| {
            links
                .iter()
                .find(|(_, link)| RcThreadSafety::ptr_eq(link, target))
                .map(|(id, _)| id.clone())
                .unwrap()
        };

        let mut structure = Vec::new();
        for (id, link) in &links {
            for (property, slot) in [("left", &link.left), ("right", &link.right)] {
                if let Some(target) = slot.get() {
                    structure.push((id.clone(), property, id_of(&target)));
                }
            }
        }
        structure
    }

    #[test]
    #[traced_test]
    fn test_permuted_graphs() {
        let types = TypeRegistry::new().provide::<Link>("Link");
        let declarations = vec![
            BeanDeclaration::new("a", "Link").property("left", "b"),
            BeanDeclaration::new("b", "Link").property("left", "a"),
            BeanDeclaration::new("c", "Link").property("left", "d").property("right", "a"),
            BeanDeclaration::new("d", "Link").property("left", "e"),
            BeanDeclaration::new("e", "Link").property("right", "e"),
        ];

        let expected = link_structure(&Container::from_reader(&types, declarations.clone()).unwrap());
        assert_eq!(expected.len(), 6);

        let mut permutations: Vec<Vec<BeanDeclaration>> = (1..declarations.len())
            .map(|shift| {
                let mut rotated = declarations.clone();
                rotated.rotate_left(shift);
                rotated
            })
            .collect();
        let mut reversed = declarations.clone();
        reversed.reverse();
        permutations.push(reversed);

        for permutation in permutations {
            let container = Container::from_reader(&types, permutation).unwrap();
            assert_eq!(link_structure(&container), expected);
            container.close();
        }
    }

    trait Storage: Send + Sync {
        fn name(&self) -> &'static str;
    }

    struct MemoryStorage;

    impl Storage for MemoryStorage {
        fn name(&self) -> &'static str {
            "memory"
        }
    }

    #[derive(Default)]
    struct Repository {
        storage: Autowired<Box<dyn Storage>>,
    }

    wire!(Box<dyn Storage>);
    wire!(Repository { storage });

    #[test]
    #[traced_test]
    fn test_wire_trait_object() {
        let types = TypeRegistry::new()
            .provide::<Repository>("Repository")
            .provide_with("MemoryStorage", || Ok::<Box<dyn Storage>, InstantiateErrorKind>(Box::new(MemoryStorage)));

        let container = Container::from_reader(
            &types,
            vec![
                BeanDeclaration::new("repository", "Repository").property("storage", "storage"),
                BeanDeclaration::new("storage", "MemoryStorage"),
            ],
        )
        .unwrap();

        let repository = container.get::<Repository>("repository").unwrap();
        let storage = container.get::<Box<dyn Storage>>("storage").unwrap();
        assert!(RcThreadSafety::ptr_eq(&repository.storage.get().unwrap(), &storage));
        assert_eq!(storage.name(), "memory");

        // The concrete type isn't a bean type of its own
        assert!(matches!(
            container.get::<MemoryStorage>("storage"),
            Err(ResolveErrorKind::IncorrectType { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_empty_declarations() {
        let container = Container::from_reader(&types(), Vec::new()).unwrap();

        assert_eq!(container.bean_ids().count(), 0);
    }

    #[test]
    #[traced_test]
    fn test_duplicate_id() {
        let result = Container::from_reader(
            &types(),
            vec![BeanDeclaration::new("x", "FruitDAOImpl"), BeanDeclaration::new("x", "FruitDAOImpl")],
        );

        assert!(matches!(result, Err(BuildErrorKind::DuplicateBeanId { id }) if id == "x"));
    }

    #[test]
    #[traced_test]
    fn test_dangling_reference() {
        let result = Container::from_reader(
            &types(),
            vec![BeanDeclaration::new("A", "FruitServiceImpl").property("fruitDAO", "missing")],
        );

        assert!(matches!(
            result,
            Err(BuildErrorKind::UnknownBeanId { id, owner, property }) if id == "missing" && owner == "A" && property == "fruitDAO"
        ));
    }

    #[test]
    #[traced_test]
    fn test_unresolved_types() {
        assert!(matches!(
            Container::from_reader(&types(), vec![BeanDeclaration::new("dao", "com.hive.Missing")]),
            Err(BuildErrorKind::TypeResolution {
                source: InstantiateErrorKind::UnknownType,
                ..
            })
        ));
        assert!(matches!(
            Container::from_reader(&types(), vec![BeanDeclaration::new("dao", "FruitDAO")]),
            Err(BuildErrorKind::TypeResolution {
                source: InstantiateErrorKind::NotInstantiable,
                ..
            })
        ));
    }

    #[test]
    #[traced_test]
    fn test_unresolved_properties() {
        let result = Container::from_reader(
            &types(),
            vec![
                BeanDeclaration::new("service", "FruitServiceImpl").property("fruitDao", "dao"),
                BeanDeclaration::new("dao", "FruitDAOImpl"),
            ],
        );
        assert!(matches!(
            result,
            Err(BuildErrorKind::PropertyResolution {
                source: WireErrorKind::NoSlot { .. },
                ..
            })
        ));

        let result = Container::from_reader(
            &types(),
            vec![
                BeanDeclaration::new("service", "FruitServiceImpl").property("fruitDAO", "node"),
                BeanDeclaration::new("node", "Node"),
            ],
        );
        assert!(matches!(
            result,
            Err(BuildErrorKind::PropertyResolution {
                source: WireErrorKind::IncorrectType { .. },
                ..
            })
        ));
    }

    #[test]
    #[traced_test]
    fn test_invalid_declaration() {
        assert!(matches!(
            Container::from_reader(&types(), vec![BeanDeclaration::new("", "FruitDAOImpl")]),
            Err(BuildErrorKind::ConfigurationLoad(LoadErrorKind::InvalidDeclaration { index: 0, .. }))
        ));
    }

    #[test]
    #[traced_test]
    fn test_lookup_errors() {
        let container = Container::from_reader(&types(), fruit_declarations()).unwrap();

        assert!(matches!(
            container.get_bean("undeclared"),
            Err(ResolveErrorKind::UnknownBeanId { id }) if id == "undeclared"
        ));
        assert!(matches!(
            container.get::<FruitService>("fruitDAO"),
            Err(ResolveErrorKind::IncorrectType { .. })
        ));
        assert!(!container.contains_bean("undeclared"));
    }

    #[test]
    #[traced_test]
    fn test_bean_outlives_container() {
        let service = Container::from_reader(&types(), fruit_declarations())
            .unwrap()
            .get::<FruitService>("fruitService")
            .unwrap();

        assert!(service.fruit_dao.is_wired());

        let controller = {
            let container = Container::from_reader(&types(), fruit_declarations()).unwrap();
            container.get::<FruitController>("fruit").unwrap()
        };
        let service = controller.fruit_service.get().unwrap();
        assert!(service.fruit_dao.get().is_some());
    }

    #[test]
    #[traced_test]
    fn test_close_releases_cycles() {
        static DROPPED: AtomicUsize = AtomicUsize::new(0);

        #[derive(Default)]
        struct Tracked {
            peer: Autowired<Tracked>,
        }

        impl Drop for Tracked {
            fn drop(&mut self) {
                DROPPED.fetch_add(1, Ordering::SeqCst);
            }
        }

        wire!(Tracked { peer });

        let types = TypeRegistry::new().provide::<Tracked>("Tracked");
        let container = Container::from_reader(
            &types,
            vec![
                BeanDeclaration::new("a", "Tracked").property("peer", "b"),
                BeanDeclaration::new("b", "Tracked").property("peer", "a"),
            ],
        )
        .unwrap();

        let a = container.get::<Tracked>("a").unwrap();
        let clone = container.clone();
        assert!(a.peer.is_wired());

        container.close();
        assert!(!a.peer.is_wired());
        assert!(!clone.get::<Tracked>("b").unwrap().peer.is_wired());
        assert_eq!(DROPPED.load(Ordering::SeqCst), 0);

        drop(container);
        drop(clone);
        assert_eq!(DROPPED.load(Ordering::SeqCst), 1);

        drop(a);
        assert_eq!(DROPPED.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[traced_test]
    fn test_failed_build_releases_beans() {
        static DROPPED: AtomicUsize = AtomicUsize::new(0);

        #[derive(Default)]
        struct Tracked {
            peer: Autowired<Tracked>,
        }

        impl Drop for Tracked {
            fn drop(&mut self) {
                DROPPED.fetch_add(1, Ordering::SeqCst);
            }
        }

        wire!(Tracked { peer });

        let types = TypeRegistry::new().provide::<Tracked>("Tracked");
        let result = Container::from_reader(
            &types,
            vec![
                BeanDeclaration::new("a", "Tracked").property("peer", "b"),
                BeanDeclaration::new("b", "Tracked").property("peer", "a"),
                BeanDeclaration::new("c", "Tracked").property("peer", "missing"),
            ],
        );

        assert!(matches!(result, Err(BuildErrorKind::UnknownBeanId { .. })));
        assert_eq!(DROPPED.load(Ordering::SeqCst), 3);
        assert!(logs_contain("Phase changed"));
    }
}
