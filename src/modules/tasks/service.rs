use schoolhub_access::{
    AccessError, Caller, Chain, MutationGuard, Operation, OwnershipResolver, Resolved, grants,
};
use schoolhub_core::AppError;
use schoolhub_db::Store;
use schoolhub_models::{
    Class, ClassId, CreateTaskDto, NewTask, SchoolId, StudentProfile, StudentProfileId, Task,
    TaskId, TeacherProfileId, UpdateTaskDto,
};
use tracing::{info, instrument};

use crate::utils::enforce;

pub struct TaskService;

/// The records a task points at, loaded before any permission check.
struct Targets {
    student: Option<(Resolved<StudentProfile>, Class)>,
    class: Option<Resolved<Class>>,
}

impl Targets {
    async fn load(
        resolver: &OwnershipResolver<'_>,
        student_id: Option<StudentProfileId>,
        class_id: Option<ClassId>,
    ) -> Result<Self, AccessError> {
        let student = match student_id {
            Some(id) => {
                let student = resolver.student(id).await?;
                let class = resolver.class(student.record.class_id).await?.record;
                Some((student, class))
            }
            None => None,
        };
        let class = match class_id {
            Some(id) => Some(resolver.class(id).await?),
            None => None,
        };
        Ok(Self { student, class })
    }

    /// Chain of the task being written: the explicit class when one is
    /// named, otherwise the student's class.
    fn chain(&self, teacher_id: TeacherProfileId, school_id: SchoolId) -> Chain {
        let mut chain = match (&self.class, &self.student) {
            (Some(class), _) => class.chain.clone(),
            (None, Some((student, _))) => student.chain.clone(),
            (None, None) => Chain::school(school_id),
        };
        chain.student = self.student.as_ref().map(|(s, _)| s.record.id);
        chain.assigner = Some(teacher_id);
        chain.class_wide = self.student.is_none();
        chain
    }

    fn check(&self, school_id: SchoolId) -> Result<(), AccessError> {
        MutationGuard::task_targets(
            school_id,
            self.student.as_ref().map(|(s, class)| (&s.record, class)),
            self.class.as_ref().map(|c| &c.record),
        )
    }
}

/// School of the assigning teacher; every target must belong to it.
async fn teacher_school(
    resolver: &OwnershipResolver<'_>,
    teacher_id: TeacherProfileId,
) -> Result<SchoolId, AccessError> {
    resolver
        .teacher(teacher_id)
        .await?
        .chain
        .school_id
        .ok_or_else(|| AccessError::invalid("Teacher is not associated with a school"))
}

impl TaskService {
    #[instrument(skip(store, caller, dto), fields(task.title = %dto.title))]
    pub async fn create_task(
        store: &dyn Store,
        caller: &Caller,
        dto: CreateTaskDto,
    ) -> Result<Task, AppError> {
        let resolver = OwnershipResolver::new(store);
        let targets = Targets::load(&resolver, dto.student_id, dto.class_id).await?;
        // Roles that can never create tasks are refused before the payload is
        // inspected any further.
        if grants(Operation::CreateTask, caller.role()).is_empty() {
            enforce(Operation::CreateTask, caller, &Chain::unscoped())?;
        }
        let teacher_id = match caller.teacher_profile() {
            Some(me) => me,
            None => dto.teacher_id.ok_or_else(|| {
                AccessError::invalid("teacher_id is required when an administrator assigns a task")
            })?,
        };
        let school_id = teacher_school(&resolver, teacher_id).await?;

        enforce(
            Operation::CreateTask,
            caller,
            &targets.chain(teacher_id, school_id),
        )?;
        targets.check(school_id)?;

        let task = store
            .insert_task(NewTask {
                teacher_id,
                student_id: dto.student_id,
                class_id: dto.class_id,
                title: dto.title,
                description: dto.description,
                due_date: dto.due_date,
            })
            .await?;
        info!(task.id = %task.id, teacher.id = %teacher_id, "Task created");
        Ok(task)
    }

    #[instrument(skip(store, caller))]
    pub async fn get_task(store: &dyn Store, caller: &Caller, id: TaskId) -> Result<Task, AppError> {
        let task = OwnershipResolver::new(store).task(id).await?;
        enforce(Operation::ViewTask, caller, &task.chain)?;
        Ok(task.record)
    }

    /// Students may move their own task through its statuses and touch
    /// nothing else; a student payload with any other field is rejected.
    #[instrument(skip(store, caller, dto))]
    pub async fn update_task(
        store: &dyn Store,
        caller: &Caller,
        id: TaskId,
        dto: UpdateTaskDto,
    ) -> Result<Task, AppError> {
        let resolver = OwnershipResolver::new(store);
        let resolved = resolver.task(id).await?;
        let retargeted = dto.student_id.is_some() || dto.class_id.is_some();
        let targets = if retargeted {
            Some(
                Targets::load(
                    &resolver,
                    dto.student_id.or(resolved.record.student_id),
                    dto.class_id.or(resolved.record.class_id),
                )
                .await?,
            )
        } else {
            None
        };

        if caller.student_profile().is_some() && !dto.is_status_only() {
            return Err(AppError::forbidden(
                "Students may only update the status of their tasks",
            ));
        }
        let operation = if dto.is_status_only() {
            Operation::UpdateTaskStatus
        } else {
            Operation::UpdateTask
        };
        enforce(operation, caller, &resolved.chain)?;

        if let Some(targets) = &targets {
            let teacher_id = resolved.record.teacher_id;
            let school_id = teacher_school(&resolver, teacher_id).await?;
            enforce(operation, caller, &targets.chain(teacher_id, school_id))?;
            targets.check(school_id)?;
        }

        let mut task = resolved.record;
        dto.apply(&mut task);
        let task = store.update_task(&task).await?;
        info!(task.id = %task.id, status = ?task.status, "Task updated");
        Ok(task)
    }

    #[instrument(skip(store, caller))]
    pub async fn delete_task(store: &dyn Store, caller: &Caller, id: TaskId) -> Result<(), AppError> {
        let task = OwnershipResolver::new(store).task(id).await?;
        enforce(Operation::DeleteTask, caller, &task.chain)?;

        store.delete_task(id).await?;
        info!(task.id = %id, "Task deleted");
        Ok(())
    }

    /// The caller's own tasks: assigned by a teacher, or addressed to a
    /// student directly or through their class.
    #[instrument(skip(store, caller))]
    pub async fn list_mine(store: &dyn Store, caller: &Caller) -> Result<Vec<Task>, AppError> {
        let tasks = match caller {
            Caller::Teacher { profile_id, .. } => store.list_tasks_by_teacher(*profile_id).await?,
            Caller::Student {
                profile_id,
                class_id,
                ..
            } => store.list_tasks_for_student(*profile_id, *class_id).await?,
            _ => Vec::new(),
        };
        Ok(tasks)
    }

    #[instrument(skip(store, caller))]
    pub async fn list_by_student(
        store: &dyn Store,
        caller: &Caller,
        student_id: StudentProfileId,
    ) -> Result<Vec<Task>, AppError> {
        let student = OwnershipResolver::new(store).student(student_id).await?;
        enforce(Operation::ViewStudentTasks, caller, &student.chain)?;
        Ok(store
            .list_tasks_for_student(student_id, student.record.class_id)
            .await?)
    }
}
