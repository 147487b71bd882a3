use crate::light::{Light, LightCollection};
use crate::resource::{Geometry, Material};
use crate::scene::{DrawItem, Object3d};
use glamx::{Mat4, Pose3, Quat, Vec3};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::rc::Weak;

/// The data contained by a `SceneNode3d`.
pub struct SceneNodeData3d {
    name: Option<String>,
    local_scale: Vec3,
    local_transform: Pose3,
    world_transform: Mat4,
    visible: bool,
    up_to_date: bool,
    children: Vec<SceneNode3d>,
    object: Option<Object3d>,
    light: Option<Light>,
    parent: Option<Weak<RefCell<SceneNodeData3d>>>,
}

/// A node of the scene graph.
///
/// This may represent a group of other nodes, and/or contain an object that can be rendered,
/// and/or a light. Cloning a `SceneNode3d` yields another handle to the same node; use
/// [`SceneNode3d::instantiate`] to get an independent copy of a subtree.
#[derive(Clone)]
pub struct SceneNode3d {
    data: Rc<RefCell<SceneNodeData3d>>,
}

impl SceneNodeData3d {
    fn remove(&mut self, o: &SceneNode3d) {
        if let Some(i) = self
            .children
            .iter()
            .rposition(|e| Rc::ptr_eq(&o.data, &e.data))
        {
            let _ = self.children.remove(i);
        }
    }

    /// The name of this node, if any.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether this node contains an `Object3d`.
    #[inline]
    pub fn has_object(&self) -> bool {
        self.object.is_some()
    }

    /// Whether this node has no parent.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// A reference to the object possibly contained by this node.
    #[inline]
    pub fn object(&self) -> Option<&Object3d> {
        self.object.as_ref()
    }

    /// The light possibly attached to this node.
    #[inline]
    pub fn light(&self) -> Option<&Light> {
        self.light.as_ref()
    }

    /// The children of this node.
    #[inline]
    pub fn children(&self) -> &[SceneNode3d] {
        &self.children[..]
    }

    /// Whether this node and its children are rendered.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.local_scale,
            self.local_transform.rotation,
            self.local_transform.translation,
        )
    }

    /// Updates the world transforms of the subtree rooted by this node, then collects every
    /// visible object and light of that subtree.
    pub fn prepare(&mut self, draws: &mut Vec<DrawItem>, lights: &mut LightCollection) {
        let parent_transform = match self.parent.as_ref().and_then(|p| p.upgrade()) {
            Some(p) => {
                let mut p = p.borrow_mut();
                p.update();
                p.world_transform
            }
            None => Mat4::IDENTITY,
        };

        self.do_prepare(parent_transform, draws, lights);
    }

    fn do_prepare(
        &mut self,
        parent_transform: Mat4,
        draws: &mut Vec<DrawItem>,
        lights: &mut LightCollection,
    ) {
        if !self.up_to_date {
            self.up_to_date = true;
            self.world_transform = parent_transform * self.local_matrix();
        }

        if !self.visible {
            return;
        }

        if let Some(ref o) = self.object {
            draws.push(DrawItem {
                geometry: o.geometry().clone(),
                material: o.material().clone(),
                model: self.world_transform,
            });
        }

        if let Some(ref light) = self.light {
            let _ = lights.add(light, self.world_transform.w_axis.truncate());
        }

        for c in self.children.iter_mut() {
            c.data_mut()
                .do_prepare(self.world_transform, draws, lights);
        }
    }

    fn invalidate(&mut self) {
        self.up_to_date = false;

        for c in self.children.iter_mut() {
            let mut dm = c.data_mut();

            if dm.up_to_date {
                dm.invalidate()
            }
        }
    }

    fn update(&mut self) {
        if !self.up_to_date {
            if let Some(ref mut p) = self.parent {
                if let Some(dp) = p.upgrade() {
                    let mut dp = dp.borrow_mut();
                    dp.update();
                    self.world_transform = dp.world_transform * self.local_matrix();
                    self.up_to_date = true;
                    return;
                }
            }

            // no parent
            self.world_transform = self.local_matrix();
            self.up_to_date = true;
        }
    }
}

impl Default for SceneNode3d {
    fn default() -> SceneNode3d {
        SceneNode3d::empty()
    }
}

impl SceneNode3d {
    /// Creates a new unrooted scene node with the specified properties.
    ///
    /// # Arguments
    /// * `local_scale` - The initial scale factors along each axis
    /// * `local_transform` - The initial local transformation (rotation + translation)
    /// * `object` - Optional object to render (None for empty group nodes)
    pub fn new(local_scale: Vec3, local_transform: Pose3, object: Option<Object3d>) -> SceneNode3d {
        let data = SceneNodeData3d {
            name: None,
            local_scale,
            local_transform,
            world_transform: Mat4::IDENTITY,
            visible: true,
            up_to_date: false,
            children: Vec::new(),
            object,
            light: None,
            parent: None,
        };

        SceneNode3d {
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// Creates a new empty scene node with identity transformations.
    pub fn empty() -> SceneNode3d {
        SceneNode3d::new(Vec3::ONE, Pose3::IDENTITY, None)
    }

    /// Creates a new empty, named scene node. Useful for groups.
    pub fn named(name: &str) -> SceneNode3d {
        let mut node = SceneNode3d::empty();
        node.data_mut().name = Some(name.to_string());
        node
    }

    /// Creates a new scene node displaying `geometry` with `material`.
    pub fn mesh(geometry: Rc<Geometry>, material: Rc<Material>) -> SceneNode3d {
        SceneNode3d::new(
            Vec3::ONE,
            Pose3::IDENTITY,
            Some(Object3d::new(geometry, material)),
        )
    }

    /// Creates a new scene node with a light.
    ///
    /// The light's position is determined by the node's world transform.
    pub fn new_light(light: Light) -> SceneNode3d {
        let mut node = SceneNode3d::empty();
        node.data_mut().light = Some(light);
        node
    }

    /// Returns an immutable reference to this node's internal data.
    pub fn data(&self) -> Ref<'_, SceneNodeData3d> {
        self.data.borrow()
    }

    /// Returns a mutable reference to this node's internal data.
    pub fn data_mut(&mut self) -> RefMut<'_, SceneNodeData3d> {
        self.data.borrow_mut()
    }

    /// Whether `self` and `other` are handles to the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &SceneNode3d) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Removes this node from its parent in the scene graph.
    pub fn remove(&mut self) {
        let parent = self.data_mut().parent.take();

        if let Some(p) = parent.and_then(|p| p.upgrade()) {
            p.borrow_mut().remove(self);
        }

        self.data_mut().invalidate();
    }

    /*
     *
     * Methods to add children.
     *
     */
    /// Adds an empty group node as a child of this node.
    ///
    /// # Returns
    /// The newly created child `SceneNode3d`
    pub fn add_group(&mut self, name: &str) -> SceneNode3d {
        let node = SceneNode3d::named(name);

        self.add_child(node.clone());

        node
    }

    /// Adds an existing node as a child of this node.
    ///
    /// # Panics
    /// Panics if the node already has a parent.
    pub fn add_child(&mut self, node: SceneNode3d) {
        assert!(
            node.data().is_root(),
            "The added node must not have a parent yet."
        );

        let mut node = node;
        let self_weak_ptr = Rc::downgrade(&self.data);
        {
            let mut data = node.data_mut();
            data.parent = Some(self_weak_ptr);
            data.invalidate();
        }
        self.data_mut().children.push(node)
    }

    /// Adds a mesh as a child of this node.
    ///
    /// # Returns
    /// The newly created child `SceneNode3d`
    pub fn add_mesh(&mut self, geometry: Rc<Geometry>, material: Rc<Material>) -> SceneNode3d {
        let node = SceneNode3d::mesh(geometry, material);

        self.add_child(node.clone());

        node
    }

    /// Adds a light as a child of this node.
    ///
    /// # Returns
    /// The newly created child `SceneNode3d`
    pub fn add_light(&mut self, light: Light) -> SceneNode3d {
        let node = SceneNode3d::new_light(light);

        self.add_child(node.clone());

        node
    }

    /// Creates an independent, unrooted copy of the subtree rooted by this node.
    ///
    /// Every copied node owns its transform: modifying the copy never affects the
    /// template, and the other way around. Geometries and materials are shared, not copied.
    pub fn instantiate(&self) -> SceneNode3d {
        let data = self.data();
        let mut copy = SceneNode3d::new(data.local_scale, data.local_transform, data.object.clone());

        {
            let mut copy_data = copy.data_mut();
            copy_data.name = data.name.clone();
            copy_data.visible = data.visible;
            copy_data.light = data.light.clone();
        }

        for child in data.children.iter() {
            copy.add_child(child.instantiate());
        }

        copy
    }

    /// Finds the first node named `name` in the subtree rooted by this node, depth-first.
    pub fn find(&self, name: &str) -> Option<SceneNode3d> {
        let data = self.data();

        if data.name.as_deref() == Some(name) {
            return Some(self.clone());
        }

        data.children.iter().find_map(|c| c.find(name))
    }

    /// Applies a closure to each object contained by this node and its children.
    pub fn apply_to_objects<F: FnMut(&Object3d)>(&self, f: &mut F) {
        let data = self.data();

        if let Some(ref o) = data.object {
            f(o)
        }

        for c in data.children.iter() {
            c.apply_to_objects(f)
        }
    }

    /// The number of nodes of the subtree rooted by this node, itself included.
    pub fn num_nodes(&self) -> usize {
        1 + self
            .data()
            .children
            .iter()
            .map(|c| c.num_nodes())
            .sum::<usize>()
    }

    /// Updates the world transforms of this subtree and collects what has to be drawn.
    pub fn prepare(&mut self, draws: &mut Vec<DrawItem>, lights: &mut LightCollection) {
        self.data_mut().prepare(draws, lights)
    }

    /*
     *
     * Transformation accessors.
     *
     */
    /// Sets this node name.
    pub fn set_name(&mut self, name: &str) -> Self {
        self.data_mut().name = Some(name.to_string());
        self.clone()
    }

    /// Sets the visibility of this node.
    ///
    /// The node and its children are not rendered if it is not visible.
    #[inline]
    pub fn set_visible(&mut self, visible: bool) -> Self {
        self.data_mut().visible = visible;
        self.clone()
    }

    /// Sets the local scaling factors of the object.
    ///
    /// A negative factor mirrors the node and its children.
    #[inline]
    pub fn set_local_scale(&mut self, sx: f32, sy: f32, sz: f32) -> Self {
        let mut data = self.data_mut();
        data.invalidate();
        data.local_scale = Vec3::new(sx, sy, sz);
        drop(data);
        self.clone()
    }

    /// Returns the scaling factors of the object.
    #[inline]
    pub fn local_scale(&self) -> Vec3 {
        self.data().local_scale
    }

    /// This node local transformation.
    #[inline]
    pub fn local_transformation(&self) -> Pose3 {
        self.data().local_transform
    }

    /// Sets this node's local transformation, replacing the current one.
    #[inline]
    pub fn set_pose(&mut self, t: Pose3) -> Self {
        let mut data = self.data_mut();
        data.invalidate();
        data.local_transform = t;
        drop(data);
        self.clone()
    }

    /// This node world transformation, scale included.
    ///
    /// This will force an update of the world transformation of its parents if they have been
    /// invalidated.
    #[inline]
    pub fn world_transformation(&self) -> Mat4 {
        let mut data = self.data.borrow_mut();
        data.update();
        data.world_transform
    }

    /// Returns this node's local translation component.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.data().local_transform.translation
    }

    /// Sets the local translation of this node.
    #[inline]
    pub fn set_position(&mut self, t: Vec3) -> Self {
        let mut data = self.data_mut();
        data.invalidate();
        data.local_transform.translation = t;
        drop(data);
        self.clone()
    }

    /// Translates this node, relative to its parent.
    #[inline]
    pub fn translate(&mut self, t: Vec3) -> Self {
        let mut data = self.data_mut();
        data.invalidate();
        data.local_transform.translation += t;
        drop(data);
        self.clone()
    }

    /// Returns this node's local rotation component.
    #[inline]
    pub fn rotation(&self) -> Quat {
        self.data().local_transform.rotation
    }

    /// Sets this node's local rotation, replacing the current one.
    #[inline]
    pub fn set_rotation(&mut self, r: Quat) -> Self {
        let mut data = self.data_mut();
        data.invalidate();
        data.local_transform.rotation = r;
        drop(data);
        self.clone()
    }

    /// Returns the light attached to this node, if any.
    pub fn light(&self) -> Option<Light> {
        self.data().light.clone()
    }
}
